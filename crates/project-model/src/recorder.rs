//! Recorder cursor-code adapter.
//!
//! The recorder tags each sample with the numeric handle of the system
//! cursor that was active. Those codes stop at this module: everything
//! downstream only sees [`CursorKind`].

use crate::cursor::CursorKind;

/// Standard arrow.
pub const CODE_ARROW: u32 = 65539;
/// Text I-beam.
pub const CODE_TEXT: u32 = 65541;
/// Pointing hand.
pub const CODE_POINTER: u32 = 65567;
/// North-south resize.
pub const CODE_RESIZE_VERTICAL: u32 = 65551;
/// East-west resize.
pub const CODE_RESIZE_HORIZONTAL: u32 = 65569;

/// Map a recorder cursor code to a cursor kind.
///
/// Unknown codes are drawn as the standard arrow.
pub fn cursor_kind_from_code(code: u32) -> CursorKind {
    match code {
        CODE_ARROW => CursorKind::Arrow,
        CODE_TEXT => CursorKind::Text,
        CODE_POINTER => CursorKind::Pointer,
        CODE_RESIZE_VERTICAL => CursorKind::ResizeVertical,
        CODE_RESIZE_HORIZONTAL => CursorKind::ResizeHorizontal,
        other => {
            tracing::debug!(code = other, "Unknown recorder cursor code, using arrow");
            CursorKind::Arrow
        }
    }
}

/// The recorder code written back for a cursor kind.
pub fn code_for_cursor_kind(kind: CursorKind) -> u32 {
    match kind {
        CursorKind::Arrow => CODE_ARROW,
        CursorKind::Text => CODE_TEXT,
        CursorKind::Pointer => CODE_POINTER,
        CursorKind::ResizeVertical => CODE_RESIZE_VERTICAL,
        CursorKind::ResizeHorizontal => CODE_RESIZE_HORIZONTAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_both_ways() {
        for kind in CursorKind::ALL {
            assert_eq!(cursor_kind_from_code(code_for_cursor_kind(kind)), kind);
        }
    }

    #[test]
    fn test_unknown_code_is_arrow() {
        assert_eq!(cursor_kind_from_code(32512), CursorKind::Arrow);
        assert_eq!(cursor_kind_from_code(0), CursorKind::Arrow);
    }
}
