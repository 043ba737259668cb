//! Parser for `xcodebuild -showBuildSettings` output.
//!
//! The output is a sequence of target blocks:
//!
//! ```text
//! Build settings for action archive and target first:
//!     TARGETNAME = first
//!     ARCHS = arm64
//!
//! Build settings for action archive and target second:
//!     TARGETNAME = second
//! ```
//!
//! Parsing is a line state machine with two states. While `AwaitingHeader`,
//! non-indented preamble sections printed by `xcodebuild` (such as
//! `User defaults from command line:`) are skipped together with their
//! indented lines, but a `KEY = VALUE` line that belongs to no section is an
//! error, indented or not. `InBlock` collects indented `KEY = VALUE` lines
//! until the next header.

use tracing::trace;

use super::container::SettingsMap;
use super::types::SettingsError;

const HEADER_PREFIX: &str = "Build settings for action ";

/// Settings of one target as they appeared in the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBlock {
  /// The action named in the header (e.g. `archive`).
  pub action: String,

  /// The target named in the header.
  pub target: String,

  /// Every `KEY = VALUE` line of the block; later keys overwrite earlier ones.
  pub settings: SettingsMap,
}

enum ParseState {
  AwaitingHeader { in_preamble: bool },
  InBlock(TargetBlock),
}

/// Split raw settings text into target blocks, in the order they appear.
pub fn parse_build_settings(text: &str) -> Result<Vec<TargetBlock>, SettingsError> {
  let mut blocks = Vec::new();
  let mut state = ParseState::AwaitingHeader { in_preamble: false };

  for (idx, raw_line) in text.lines().enumerate() {
    let line_no = idx + 1;
    let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

    if line.trim().is_empty() {
      continue;
    }

    let indented = line.starts_with(' ') || line.starts_with('\t');

    if !indented && line.starts_with(HEADER_PREFIX) {
      let (action, target) = parse_header(line, line_no)?;
      trace!(line = line_no, target = %target, "target block");
      if let ParseState::InBlock(block) = state {
        blocks.push(block);
      }
      state = ParseState::InBlock(TargetBlock {
        action,
        target,
        settings: SettingsMap::new(),
      });
      continue;
    }

    state = match state {
      ParseState::AwaitingHeader { in_preamble } => {
        if !indented && parse_setting(line).is_some() {
          return Err(SettingsError::Parse {
            line: line_no,
            message: "setting appears before any target header".to_string(),
          });
        } else if !indented {
          ParseState::AwaitingHeader { in_preamble: true }
        } else if in_preamble {
          ParseState::AwaitingHeader { in_preamble }
        } else if parse_setting(line.trim_start()).is_some() {
          return Err(SettingsError::Parse {
            line: line_no,
            message: "setting appears before any target header".to_string(),
          });
        } else {
          return Err(SettingsError::Parse {
            line: line_no,
            message: format!("unexpected indented line outside of a target block: {}", line.trim()),
          });
        }
      }
      ParseState::InBlock(mut block) => {
        if !indented {
          return Err(SettingsError::Parse {
            line: line_no,
            message: format!("expected an indented setting or a target header, got: {}", line),
          });
        }

        let (key, value) = parse_setting(line.trim_start()).ok_or_else(|| SettingsError::Parse {
          line: line_no,
          message: format!("expected KEY = VALUE, got: {}", line.trim()),
        })?;
        block.settings.insert(key.to_string(), value.to_string());
        ParseState::InBlock(block)
      }
    };
  }

  if let ParseState::InBlock(block) = state {
    blocks.push(block);
  }

  Ok(blocks)
}

/// Parse `Build settings for action <action> [and] target <name>[:]`.
fn parse_header(line: &str, line_no: usize) -> Result<(String, String), SettingsError> {
  let rest = line[HEADER_PREFIX.len()..].trim_end();
  let rest = rest.strip_suffix(':').unwrap_or(rest);

  let split = rest
    .split_once(" and target ")
    .or_else(|| rest.split_once(" target "));

  match split {
    Some((action, target)) if !action.trim().is_empty() && !target.trim().is_empty() => {
      Ok((action.trim().to_string(), target.trim().to_string()))
    }
    _ => Err(SettingsError::Parse {
      line: line_no,
      message: format!("malformed target header: {}", line),
    }),
  }
}

/// Parse `KEY = VALUE`. The value may be empty; it is otherwise kept verbatim.
fn parse_setting(line: &str) -> Option<(&str, &str)> {
  let (key, value) = match line.split_once(" = ") {
    Some(pair) => pair,
    None => (line.strip_suffix(" =")?, ""),
  };

  if key.is_empty() || key.contains(char::is_whitespace) {
    return None;
  }

  Some((key, value))
}
