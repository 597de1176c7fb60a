//! Device-operation parsing: `<id>[.<member>[ = <value> | (<args>)]]`.

use devsh_types::Literal;
use devsh_types::error::Result;

use crate::command::{DeviceOperation, ParsedCommand};

/// The device identifier of a line: everything before the first `.`,
/// trimmed.
pub fn device_identifier(line: &str) -> &str {
    match line.find('.') {
        Some(dot) => line[..dot].trim(),
        None => line.trim(),
    }
}

/// Parse a line that is not a builtin into a device interaction.
///
/// Returns [`ParsedCommand::Unrecognized`] when the identifier or member name
/// is empty. Fails with `AmbiguousParameterType` when a method argument is
/// neither a quoted string nor an integer.
pub fn parse_device_operation(line: &str) -> Result<ParsedCommand> {
    let device_id = device_identifier(line);
    if device_id.is_empty() {
        return Ok(ParsedCommand::Unrecognized);
    }

    let Some(dot) = line.find('.') else {
        return Ok(interaction(device_id, DeviceOperation::Describe));
    };
    let suffix = &line[dot..];

    let operation = if let Some((left, right)) = split_assignment(suffix) {
        let name = left.strip_prefix('.').unwrap_or(left).trim();
        if name.is_empty() {
            return Ok(ParsedCommand::Unrecognized);
        }
        DeviceOperation::SetAttribute {
            name: name.to_string(),
            raw_value: right.trim().to_string(),
        }
    } else if let Some(name) = attribute_name(suffix) {
        if name.is_empty() {
            return Ok(ParsedCommand::Unrecognized);
        }
        DeviceOperation::GetAttribute {
            name: name.to_string(),
        }
    } else {
        let body = &suffix[1..];
        let (name, params) = match body.find('(') {
            Some(open) => (&body[..open], parameter_text(&body[open + 1..])),
            None => (body, ""),
        };
        let name = name.trim();
        if name.is_empty() {
            return Ok(ParsedCommand::Unrecognized);
        }
        DeviceOperation::InvokeMethod {
            name: name.to_string(),
            params: parse_params(params)?,
        }
    };

    Ok(interaction(device_id, operation))
}

fn interaction(device_id: &str, operation: DeviceOperation) -> ParsedCommand {
    ParsedCommand::DeviceInteraction {
        device_id: device_id.to_string(),
        operation,
    }
}

/// Split at the first `=` outside parentheses.
fn split_assignment(suffix: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in suffix.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Some((&suffix[..i], &suffix[i + 1..])),
            _ => {},
        }
    }
    None
}

/// `.name` with no further dots and no call parentheses.
fn attribute_name(suffix: &str) -> Option<&str> {
    let mut segments = suffix.split('.');
    let (Some(_), Some(second), None) = (segments.next(), segments.next(), segments.next())
    else {
        return None;
    };
    if second.contains('(') {
        None
    } else {
        Some(second.trim())
    }
}

/// Text up to the last `)`, or everything when unclosed.
fn parameter_text(after_open: &str) -> &str {
    match after_open.rfind(')') {
        Some(close) => &after_open[..close],
        None => after_open,
    }
}

// Commas inside quoted strings are not protected.
fn parse_params(text: &str) -> Result<Vec<Literal>> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Literal::parse)
        .collect()
}
