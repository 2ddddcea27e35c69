use super::constants::get_constant;
use etools::Width;
use proc_macro2::{Ident, Span};
use proc_macro_error2::emit_error;
use std::collections::HashMap;
use syn::{spanned::Spanned, Expr, Lit, RangeLimits, UnOp};

/// Ranges longer than this are almost certainly typos.
const MAX_RANGE_LEN: u64 = 1 << 24;

/// A key as written, before it is placed on a particular target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Int(u64),
    /// `usize::MAX`.
    PointerMax,
}

impl KeyValue {
    pub const fn resolve(self, width: Width) -> u64 {
        match self {
            Self::Int(value) => value,
            Self::PointerMax => width.max(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyType {
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl KeyType {
    pub fn from_ident(ident: &Ident) -> Option<Self> {
        Some(match ident.to_string().as_str() {
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "usize" => Self::Usize,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
        }
    }

    /// The largest key, or `None` if it depends on the target.
    #[allow(clippy::cast_lossless, reason = "`u64::from` is not `const`")]
    pub const fn max(self) -> Option<u64> {
        match self {
            Self::U8 => Some(u8::MAX as u64),
            Self::U16 => Some(u16::MAX as u64),
            Self::U32 => Some(u32::MAX as u64),
            Self::U64 => Some(u64::MAX),
            Self::Usize => None,
        }
    }
}

pub struct SpannedKey {
    pub value: KeyValue,
    pub span: Span,
}

/// Evaluate key expressions in order, expanding ranges. Diagnostics are emitted on failure.
pub fn evaluate_keys<'a>(
    exprs: impl IntoIterator<Item = &'a Expr>,
    key_type: KeyType,
) -> Result<Vec<SpannedKey>, ()> {
    let mut keys = Vec::new();
    let mut failed = false;
    for expr in exprs {
        failed |= evaluate_into(expr, key_type, &mut keys).is_none();
    }
    if failed {
        return Err(());
    }

    if keys.is_empty() {
        proc_macro_error2::emit_call_site_error!(
            "the key set is empty\ntables need at least one key"
        );
        return Err(());
    }

    let mut seen = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        if let Some(j) = seen.insert(key.value, i) {
            emit_error!(keys[j].span, "this key is equal to...");
            emit_error!(key.span, "...this key");
            return Err(());
        }
    }

    Ok(keys)
}

fn evaluate_into(expr: &Expr, key_type: KeyType, keys: &mut Vec<SpannedKey>) -> Option<()> {
    match expr {
        Expr::Paren(expr) => evaluate_into(&expr.expr, key_type, keys),
        Expr::Group(expr) => evaluate_into(&expr.expr, key_type, keys),

        Expr::Range(range) => {
            let (Some(start), Some(end)) = (&range.start, &range.end) else {
                emit_error!(range, "ranges in key position must have both bounds");
                return None;
            };
            let start = evaluate_scalar(start, key_type);
            let end = evaluate_scalar(end, key_type);
            let (KeyValue::Int(start), KeyValue::Int(end)) = (start?, end?) else {
                emit_error!(
                    range,
                    "`usize::MAX` cannot bound a range\nits value depends on the target",
                );
                return None;
            };

            let last = match range.limits {
                RangeLimits::HalfOpen(_) => match end.checked_sub(1) {
                    Some(last) => last,
                    None => return Some(()),
                },
                RangeLimits::Closed(_) => end,
            };
            if start > last {
                return Some(());
            }
            if last - start >= MAX_RANGE_LEN {
                emit_error!(
                    range,
                    "range is too long\nat most {} keys can be listed with one range",
                    MAX_RANGE_LEN,
                );
                return None;
            }

            let span = range.span();
            keys.extend((start..=last).map(|value| SpannedKey {
                value: KeyValue::Int(value),
                span,
            }));
            Some(())
        }

        _ => {
            let value = evaluate_scalar(expr, key_type)?;
            keys.push(SpannedKey {
                value,
                span: expr.span(),
            });
            Some(())
        }
    }
}

fn evaluate_scalar(expr: &Expr, key_type: KeyType) -> Option<KeyValue> {
    match expr {
        Expr::Paren(expr) => evaluate_scalar(&expr.expr, key_type),
        Expr::Group(expr) => evaluate_scalar(&expr.expr, key_type),

        Expr::Lit(lit) => {
            let Lit::Int(lit) = &lit.lit else {
                emit_error!(lit, "only integer literals are allowed in key position");
                return None;
            };

            let suffix = lit.suffix();
            if !suffix.is_empty() && suffix != key_type.name() {
                emit_error!(
                    lit,
                    "mismatched types\nexpected `{}`, found `{}`",
                    key_type.name(),
                    suffix,
                );
                return None;
            }

            let value = lit.base10_parse::<u64>().ok();
            match (value, key_type.max()) {
                (Some(value), Some(max)) if value <= max => Some(KeyValue::Int(value)),
                (Some(value), None) => Some(KeyValue::Int(value)),
                _ => {
                    emit_error!(lit, "literal out of range for `{}`", key_type.name());
                    None
                }
            }
        }

        Expr::Path(path) => {
            if path.qself.is_some()
                || path
                    .path
                    .segments
                    .iter()
                    .any(|segment| !segment.arguments.is_empty())
            {
                emit_error!(path, "only `MIN` and `MAX` constants are allowed in key position");
                return None;
            }

            let segments: Vec<String> = path
                .path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect();
            let path_str = segments.join("::");
            let Some(value) = get_constant(&path_str) else {
                emit_error!(
                    path,
                    "unknown constant `{}`\nonly `MIN` and `MAX` of unsigned integers are supported",
                    path_str,
                );
                return None;
            };
            if segments[0] != key_type.name() {
                emit_error!(
                    path,
                    "mismatched types\nexpected `{}`, found `{}`",
                    key_type.name(),
                    segments[0],
                );
                return None;
            }
            Some(value)
        }

        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            emit_error!(unary, "keys must be unsigned");
            None
        }

        _ => {
            emit_error!(
                expr,
                "unsupported key expression\nexpected an integer literal, a `MIN`/`MAX` constant, or a range of those",
            );
            None
        }
    }
}
