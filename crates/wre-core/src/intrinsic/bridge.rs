//! Intrinsic bodies
//!
//! Each body runs with its frame already entered: the argument is read from
//! `M[FP]` and the result goes back as a `Completion` for the exit sequence.

use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::error::WreResult;
use crate::vm::frame::{Completion, ReturnStatus, ARGUMENT_OFFSET};
use crate::vm::store::WordStore;
use crate::vm::value::{bool_to_word, float_to_word, word_to_float, Word};
use super::console::Console;
use super::Intrinsic;

/// Recoverable read failures. These never abort the machine; they reach
/// generated code as a `ReturnStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("cannot parse {token:?} as {expected}")]
    Format { token: String, expected: &'static str },
    #[error("end of input")]
    EndOfInput,
}

impl InputError {
    pub fn status(&self) -> ReturnStatus {
        match self {
            InputError::Format { .. } => ReturnStatus::InputFormat,
            InputError::EndOfInput => ReturnStatus::EndOfInput,
        }
    }
}

/// Run the body of `intrinsic` against the active frame
pub fn invoke<C: Console + ?Sized>(
    intrinsic: Intrinsic,
    store: &mut WordStore,
    console: &mut C,
) -> WreResult<Completion> {
    let argument = store.frame_load(ARGUMENT_OFFSET)?;

    let outcome = match intrinsic {
        Intrinsic::PrintInteger => {
            console.write_bytes(argument.to_string().as_bytes())?;
            return Ok(Completion::unit());
        }
        Intrinsic::PrintBool => {
            let text = if argument != 0 { "true" } else { "false" };
            console.write_bytes(text.as_bytes())?;
            return Ok(Completion::unit());
        }
        Intrinsic::PrintString => {
            let bytes = store.read_string(argument)?;
            console.write_bytes(&bytes)?;
            return Ok(Completion::unit());
        }
        Intrinsic::PrintFloat => {
            store.stage_float(word_to_float(argument));
            console.write_bytes(format_float(store.float_scratch()).as_bytes())?;
            return Ok(Completion::unit());
        }

        Intrinsic::ReadInteger => read_parsed::<_, Word>(console, "integer")?,
        Intrinsic::ReadFloat => read_parsed::<_, f32>(console, "float")?.map(|value| {
            store.stage_float(value);
            float_to_word(store.float_scratch())
        }),
        Intrinsic::ReadBool => match read_token(console)? {
            Ok(token) => parse_bool(&token),
            Err(e) => Err(e),
        },
        Intrinsic::ReadString => match read_token(console)? {
            Ok(token) if token.contains(&0) => Err(InputError::Format {
                token: String::from_utf8_lossy(&token).into_owned(),
                expected: "string",
            }),
            Ok(token) => Ok(store.write_string(argument, &token)? as Word),
            Err(e) => Err(e),
        },
    };

    Ok(match outcome {
        Ok(value) => Completion::value(value),
        Err(e) => {
            warn!(target: "wre::intrinsic", %intrinsic, error = %e, "read failed");
            Completion::failed(e.status())
        }
    })
}

/// Block for the next token. The outer result carries host failures, the
/// inner one recoverable input conditions.
fn read_token<C: Console + ?Sized>(console: &mut C) -> WreResult<Result<Vec<u8>, InputError>> {
    console.flush()?;
    Ok(console.next_token()?.ok_or(InputError::EndOfInput))
}

fn read_parsed<C: Console + ?Sized, T: FromStr>(
    console: &mut C,
    expected: &'static str,
) -> WreResult<Result<T, InputError>> {
    Ok(read_token(console)?.and_then(|token| {
        let text = String::from_utf8_lossy(&token);
        text.parse::<T>().map_err(|_| InputError::Format {
            token: text.into_owned(),
            expected,
        })
    }))
}

fn parse_bool(token: &[u8]) -> Result<Word, InputError> {
    let text = String::from_utf8_lossy(token);
    match text.as_ref() {
        "true" => Ok(1),
        "false" => Ok(0),
        other => other.parse::<Word>().map(|n| bool_to_word(n != 0)).map_err(|_| {
            InputError::Format { token: other.to_string(), expected: "boolean" }
        }),
    }
}

/// Fixed six-decimal rendering, `%f` style
pub fn format_float(value: f32) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_nan() {
        format!("{sign}nan")
    } else if value.is_infinite() {
        format!("{sign}inf")
    } else {
        format!("{:.6}", value)
    }
}
