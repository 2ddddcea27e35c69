//! Procedural macros behind `etools::{llut, fks, mph}`. Use those wrappers instead.

#![allow(clippy::std_instead_of_alloc, reason = "we're not in #[no_std]")]
#![allow(clippy::wildcard_enum_match_arm, reason = "too many false positives")]

mod constants;
mod keys;
mod parse;

use self::{
    keys::{evaluate_keys, KeyType, SpannedKey},
    parse::WithContext,
};
use etools::{
    codegen::{CodeGenerator, Codegen},
    Backend, BuildError, Fks, Key, Llut, Mph, Width, DEFAULT_ALPHA,
};
use proc_macro2::TokenStream;
use proc_macro_error2::{emit_error, set_dummy};
use quote::{format_ident, quote};
use syn::parse_macro_input;

#[derive(Clone, Copy)]
enum Kind {
    Llut,
    Fks,
    Mph { alpha: usize },
}

impl Kind {
    const fn type_name(self) -> &'static str {
        match self {
            Self::Llut => "Llut",
            Self::Fks => "Fks",
            Self::Mph { .. } => "Mph",
        }
    }
}

/// Narrow keys to `K` as seen by a target with pointers of `width`.
fn place<K: Key>(keys: &[SpannedKey], width: Width) -> Result<Vec<K>, String> {
    keys.iter()
        .map(|key| {
            let value = key.value.resolve(width);
            if K::POINTER_SIZED && value > width.max() {
                return Err(format!("key {value} does not fit in `usize`"));
            }
            K::from_u64(value).ok_or_else(|| {
                let ty = core::any::type_name::<K>();
                if K::POINTER_SIZED {
                    format!("key {value} does not fit in `{ty}` on the build host")
                } else {
                    format!("key {value} does not fit in `{ty}`")
                }
            })
        })
        .collect()
}

fn build<K: Key + Codegen>(
    kind: Kind,
    keys: &[K],
    width: Width,
    gen: CodeGenerator,
) -> Result<TokenStream, BuildError> {
    // A direct table must be addressable on the target, not just on the host.
    let max_key = keys.iter().max().map_or(0, |key| key.to_u64());
    let too_large = BuildError::TableTooLarge { max_key };

    Ok(match kind {
        Kind::Llut => {
            if max_key >= width.max() {
                return Err(too_large);
            }
            gen.generate(&Llut::try_from_keys(keys)?)
        }
        Kind::Fks => gen.generate(&Fks::try_from_keys_for_width(keys, width)?),
        Kind::Mph { alpha } => {
            let mph = Mph::try_from_keys_for_width(keys, alpha, width)?;
            if mph.backend() == Backend::Llut && max_key >= width.max() {
                return Err(too_large);
            }
            gen.generate(&mph)
        }
    })
}

/// One `static TABLE` per pointer width. Widths the table cannot be built for get a
/// `compile_error!` that only fires when compiling for such a target.
fn statics<K: Key + Codegen>(
    kind: Kind,
    keys: &[SpannedKey],
    ty: &TokenStream,
    etools_crate: &TokenStream,
) -> Vec<TokenStream> {
    Width::POINTER_WIDTHS
        .into_iter()
        .map(|width| {
            let value = place::<K>(keys, width).and_then(|keys| {
                let mut gen = CodeGenerator::new();
                gen.set_root(etools_crate.clone());
                build(kind, &keys, width, gen).map_err(|error| error.to_string())
            });
            let value = value.unwrap_or_else(|message| {
                let message = format!(
                    "cannot build the table for {}-bit targets: {message}",
                    width.bits(),
                );
                quote!(::core::compile_error!(#message))
            });

            let cfg = width.cfg_name();
            quote! {
                #[cfg(target_pointer_width = #cfg)]
                static TABLE: #ty = #value;
            }
        })
        .collect()
}

fn expand(input: &WithContext, kind: Kind) -> TokenStream {
    let context = &input.context;
    let etools_crate = context
        .etools_crate
        .clone()
        .unwrap_or_else(|| quote!(::etools));
    let key_ident = &context.key_type;
    let type_name = format_ident!("{}", kind.type_name());
    let ty = quote!(#etools_crate::#type_name<#key_ident>);

    set_dummy(quote! {{
        let table: &'static #ty = ::core::unreachable!();
        table
    }});

    let Some(key_type) = KeyType::from_ident(key_ident) else {
        emit_error!(
            key_ident,
            "unsupported key type `{}`\nexpected one of `u8`, `u16`, `u32`, `u64`, `usize`",
            key_ident,
        );
        return quote! {};
    };

    let kind = match (kind, &context.alpha) {
        (Kind::Mph { .. }, Some(alpha)) => match alpha.base10_parse::<usize>() {
            Ok(alpha) => Kind::Mph { alpha },
            Err(error) => {
                emit_error!(alpha, "{}", error);
                return quote! {};
            }
        },
        (_, Some(alpha)) => {
            emit_error!(alpha, "`alpha` only applies to `mph!`");
            return quote! {};
        }
        (kind, None) => kind,
    };

    let Ok(keys) = evaluate_keys(&input.keys, key_type) else {
        // Diagnostics have already been emitted
        return quote! {};
    };

    let statics = match key_type {
        KeyType::U8 => statics::<u8>(kind, &keys, &ty, &etools_crate),
        KeyType::U16 => statics::<u16>(kind, &keys, &ty, &etools_crate),
        KeyType::U32 => statics::<u32>(kind, &keys, &ty, &etools_crate),
        KeyType::U64 => statics::<u64>(kind, &keys, &ty, &etools_crate),
        KeyType::Usize => statics::<usize>(kind, &keys, &ty, &etools_crate),
    };

    quote! {{
        #(#statics)*
        &TABLE
    }}
}

// This option does not enable the `proc_macro_hack` crate. It only tweaks the error output to be
// valid in expression position.

/// Build a direct lookup table.
#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn llut(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as WithContext);
    expand(&input, Kind::Llut).into()
}

/// Build a two-level perfect hash table.
#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn fks(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as WithContext);
    expand(&input, Kind::Fks).into()
}

/// Build whichever table is cheaper.
#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn mph(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as WithContext);
    expand(
        &input,
        Kind::Mph {
            alpha: DEFAULT_ALPHA,
        },
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::keys::KeyValue;
    use proc_macro2::Span;

    fn spanned(values: &[u64]) -> Vec<SpannedKey> {
        values
            .iter()
            .map(|&value| SpannedKey {
                value: KeyValue::Int(value),
                span: Span::call_site(),
            })
            .collect()
    }

    #[test]
    fn place_fitting_keys() {
        assert_eq!(place::<u8>(&spanned(&[0, 255]), Width::W64), Ok(vec![0, 255]));
        let max = [SpannedKey {
            value: KeyValue::PointerMax,
            span: Span::call_site(),
        }];
        assert_eq!(place::<u64>(&max, Width::W32), Ok(vec![u64::from(u32::MAX)]));
    }

    #[test]
    fn place_names_the_key_type() {
        assert_eq!(
            place::<u8>(&spanned(&[1, 300]), Width::W64),
            Err("key 300 does not fit in `u8`".to_owned()),
        );
        assert_eq!(
            place::<u16>(&spanned(&[70_000]), Width::W16),
            Err("key 70000 does not fit in `u16`".to_owned()),
        );
        assert_eq!(
            place::<usize>(&spanned(&[1 << 20]), Width::W16),
            Err("key 1048576 does not fit in `usize`".to_owned()),
        );
    }
}
