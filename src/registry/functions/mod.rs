//! Built-in value function families

pub mod aggregate;
pub mod arithmetic;
pub mod boolean;
pub mod comparison;
pub mod pattern;
pub mod selection;
pub mod string;
pub mod tags;

use crate::model::{Arg, Payload, Value};

/// Whether the argument is absent or carries a null payload
pub(crate) fn is_null(arg: &Arg) -> bool {
    arg.as_ref().is_none_or(Value::is_null)
}

/// Payload of an argument, if it is present and not null
pub(crate) fn payload_of(arg: &Arg) -> Option<&Payload> {
    arg.as_ref().and_then(Value::payload)
}

/// Text payload of an argument
pub(crate) fn text_of(arg: &Arg) -> Option<&str> {
    payload_of(arg).and_then(Payload::as_text)
}

/// Whether the argument holds a text payload
pub(crate) fn is_text(arg: &Arg) -> bool {
    text_of(arg).is_some()
}

/// Argument at `index`, treating a missing position as absent
pub(crate) fn arg_at(args: &[Arg], index: usize) -> &Arg {
    const ABSENT: &Arg = &None;
    args.get(index).unwrap_or(ABSENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_covers_absent_and_null_payload() {
        assert!(is_null(&None));
        assert!(is_null(&Some(Value::null())));
        assert!(!is_null(&Some(Value::integer(0))));
    }

    #[test]
    fn test_arg_at_out_of_range() {
        let args = [Some(Value::text("a"))];
        assert_eq!(text_of(arg_at(&args, 0)), Some("a"));
        assert!(arg_at(&args, 3).is_none());
    }
}
