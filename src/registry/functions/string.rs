//! String functions: Concat, Uppercase, Lowercase, Format, Join, CreateRegex

use std::iter::Peekable;
use std::str::Chars;

use super::{is_text, payload_of, text_of};
use crate::evaluator::Env;
use crate::model::types::TYPE_STRING;
use crate::model::{Arg, Payload, Value, ValueKind};
use crate::pattern::phrase_alternation;
use crate::registry::function::{FunctionError, FunctionResult, ValueFunction};
use crate::registry::signature::{FunctionSignature, ParamInfo};

/// Natural text of an argument; null renders as empty text
fn render(arg: &Arg) -> String {
    payload_of(arg).map(Payload::to_text).unwrap_or_default()
}

fn string_value(s: String) -> Option<Value> {
    Some(Value::text(s))
}

/// Concat() function - joins the text of every argument with no separator
pub struct ConcatFunction {
    signature: FunctionSignature,
}

impl Default for ConcatFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcatFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::variadic("CONCAT", vec![], ParamInfo::required("STR", ValueKind::Any))
                .returns(TYPE_STRING),
        }
    }
}

impl ValueFunction for ConcatFunction {
    fn name(&self) -> &str {
        "CONCAT"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        Ok(string_value(args.iter().map(render).collect()))
    }

    fn documentation(&self) -> &str {
        "Concatenates the text of all arguments. Non-text arguments are stringified, null is empty."
    }
}

/// Uppercase()/Lowercase() functions
pub struct CaseFunction {
    upper: bool,
    signature: FunctionSignature,
}

impl CaseFunction {
    /// Uppercase() function
    pub fn uppercase() -> Self {
        Self::new(true)
    }

    /// Lowercase() function
    pub fn lowercase() -> Self {
        Self::new(false)
    }

    fn new(upper: bool) -> Self {
        let name = if upper { "UPPERCASE" } else { "LOWERCASE" };
        Self {
            upper,
            signature: FunctionSignature::new(name, vec![ParamInfo::required("STR", ValueKind::Any)])
                .returns(TYPE_STRING),
        }
    }
}

impl ValueFunction for CaseFunction {
    fn name(&self) -> &str {
        &self.signature.name
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let Some(payload) = args.first().and_then(payload_of) else {
            return Ok(Some(Value::new(Some(TYPE_STRING.to_string()), None)));
        };
        let text = payload.to_text();
        Ok(string_value(if self.upper {
            text.to_uppercase()
        } else {
            text.to_lowercase()
        }))
    }

    fn documentation(&self) -> &str {
        if self.upper {
            "Converts the text of the argument to upper case."
        } else {
            "Converts the text of the argument to lower case."
        }
    }
}

/// Join() function - joins the remaining arguments with the first as separator
pub struct JoinFunction {
    signature: FunctionSignature,
}

impl Default for JoinFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl JoinFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::variadic(
                "JOIN",
                vec![ParamInfo::required("GLUE", ValueKind::Text)],
                ParamInfo::any("VALUE"),
            )
            .returns(TYPE_STRING),
        }
    }
}

impl ValueFunction for JoinFunction {
    fn name(&self) -> &str {
        "JOIN"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        args.first().is_some_and(is_text)
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let glue = args.first().and_then(text_of).unwrap_or_default();
        let parts: Vec<String> = args.iter().skip(1).map(render).collect();
        Ok(string_value(parts.join(glue)))
    }

    fn documentation(&self) -> &str {
        "Joins the text of the remaining arguments, separated by the first argument."
    }
}

/// Format() function - printf-style formatting
pub struct FormatFunction {
    signature: FunctionSignature,
}

impl Default for FormatFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::variadic(
                "FORMAT",
                vec![ParamInfo::required("FORMAT", ValueKind::Text)],
                ParamInfo::any("VALUE"),
            )
            .returns(TYPE_STRING),
        }
    }
}

impl ValueFunction for FormatFunction {
    fn name(&self) -> &str {
        "FORMAT"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        args.first().is_some_and(is_text)
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let template = args.first().and_then(text_of).unwrap_or_default();
        let values: Vec<Option<&Payload>> = args.iter().skip(1).map(payload_of).collect();
        format_template(template, &values)
            .map(string_value)
            .map_err(|message| FunctionError::Format {
                name: self.name().to_string(),
                message,
            })
    }

    fn documentation(&self) -> &str {
        "Formats the remaining arguments with a printf-style template: %s %d %f %.Nf %x %b %n %% with optional width, '-' and '0' flags."
    }
}

#[derive(Default)]
struct FormatFlags {
    left_align: bool,
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
}

impl FormatFlags {
    fn pad(&self, body: String) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let fill = self.width - len;
        if self.left_align {
            format!("{body}{}", " ".repeat(fill))
        } else if self.zero_pad {
            match body.strip_prefix('-') {
                Some(digits) => format!("-{}{digits}", "0".repeat(fill)),
                None => format!("{}{body}", "0".repeat(fill)),
            }
        } else {
            format!("{}{body}", " ".repeat(fill))
        }
    }
}

/// Largest width or precision a conversion may request
pub const MAX_FORMAT_FIELD: usize = u16::MAX as usize;

fn read_field_size(chars: &mut Peekable<Chars<'_>>, what: &str) -> Result<usize, String> {
    let mut size = 0usize;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        size = size
            .checked_mul(10)
            .and_then(|n| n.checked_add(d as usize))
            .filter(|n| *n <= MAX_FORMAT_FIELD)
            .ok_or_else(|| format!("{what} exceeds {MAX_FORMAT_FIELD}"))?;
        chars.next();
    }
    Ok(size)
}

/// Apply a printf-style template to payloads
pub fn format_template(template: &str, values: &[Option<&Payload>]) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut flags = FormatFlags::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => flags.left_align = true,
                '0' => flags.zero_pad = true,
                _ => break,
            }
            chars.next();
        }
        flags.width = read_field_size(&mut chars, "width")?;
        if chars.peek() == Some(&'.') {
            chars.next();
            flags.precision = Some(read_field_size(&mut chars, "precision")?);
        }
        let conversion = chars
            .next()
            .ok_or_else(|| "template ends inside a conversion".to_string())?;
        match conversion {
            '%' => {
                out.push('%');
                continue;
            }
            'n' => {
                out.push('\n');
                continue;
            }
            _ => {}
        }

        let value = *values
            .get(next_arg)
            .ok_or_else(|| format!("missing argument for '%{conversion}'"))?;
        next_arg += 1;

        let body = match (conversion, value) {
            ('s', None) => "null".to_string(),
            ('s', Some(p)) => {
                let text = p.to_text();
                match flags.precision {
                    Some(n) => text.chars().take(n).collect(),
                    None => text,
                }
            }
            ('d', Some(Payload::Integer(i))) => i.to_string(),
            ('x', Some(Payload::Integer(i))) => format!("{i:x}"),
            ('f', Some(p)) if p.as_numeric().is_some() => {
                let x = p.as_numeric().map_or(0.0, |n| n.as_f64());
                format!("{:.*}", flags.precision.unwrap_or(6), x)
            }
            ('b', None) => "false".to_string(),
            ('b', Some(Payload::Bool(b))) => b.to_string(),
            ('b', Some(_)) => "true".to_string(),
            ('d' | 'x' | 'f', None) => "null".to_string(),
            ('d' | 'x' | 'f', Some(p)) => {
                return Err(format!("'%{conversion}' cannot format {}", p.kind()));
            }
            (other, _) => return Err(format!("unknown conversion '%{other}'")),
        };
        out.push_str(&flags.pad(body));
    }
    Ok(out)
}

/// CreateRegex() function - regex matching any phrase of a list, longest first
pub struct CreateRegexFunction {
    signature: FunctionSignature,
}

impl Default for CreateRegexFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateRegexFunction {
    /// Create the function
    pub fn new() -> Self {
        Self {
            signature: FunctionSignature::variadic(
                "CREATE_REGEX",
                vec![ParamInfo::required("PHRASES", ValueKind::Sequence)],
                ParamInfo::any("IGNORED"),
            ),
        }
    }
}

impl ValueFunction for CreateRegexFunction {
    fn name(&self) -> &str {
        "CREATE_REGEX"
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn check_args(&self, args: &[Arg]) -> bool {
        args.first()
            .and_then(payload_of)
            .is_some_and(|p| p.as_sequence().is_some())
    }

    fn apply(&self, _env: &dyn Env, args: &[Arg]) -> FunctionResult<Option<Value>> {
        let phrases = args
            .first()
            .and_then(payload_of)
            .and_then(Payload::as_sequence)
            .ok_or_else(|| FunctionError::argument_type(self.name(), 0, "List", super::arg_at(args, 0)))?
            .to_vec();
        let texts: Vec<String> = phrases.iter().map(Value::to_string).collect();
        Ok(Some(Value::regex(phrase_alternation(&texts))))
    }

    fn documentation(&self) -> &str {
        "Builds a regular expression matching any phrase in the list, tolerant to whitespace between words."
    }
}
