use proc_macro2::{TokenStream, TokenTree};
use syn::{
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
    Error, Expr, Ident, LitInt, Token,
};

/// Everything before the key list: `[crate $path;] KeyType [, alpha = N];`.
#[derive(Debug)]
pub struct Context {
    /// Path to the `etools` crate, passed in by the wrapper macros as `crate $crate;`.
    pub etools_crate: Option<TokenStream>,
    pub key_type: Ident,
    pub alpha: Option<LitInt>,
}

impl Parse for Context {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let etools_crate = if input.parse::<Token![crate]>().is_ok() {
            // `$crate` is not a valid path start for `syn`, so collect raw tokens instead.
            let mut path = TokenStream::new();
            while !input.peek(Token![;]) {
                path.extend([input.parse::<TokenTree>()?]);
            }
            input.parse::<Token![;]>()?;
            Some(path)
        } else {
            None
        };

        let key_type = input.parse::<Ident>()?;

        let alpha = if input.parse::<Token![,]>().is_ok() {
            let option = input.parse::<Ident>()?;
            if option != "alpha" {
                return Err(Error::new(
                    option.span(),
                    format!("unknown option `{option}`\nthe only supported option is `alpha`"),
                ));
            }
            input.parse::<Token![=]>()?;
            Some(input.parse::<LitInt>()?)
        } else {
            None
        };

        input.parse::<Token![;]>()?;

        Ok(Self {
            etools_crate,
            key_type,
            alpha,
        })
    }
}

type Comma = Token![,];

#[derive(Debug)]
pub struct WithContext {
    pub context: Context,
    pub keys: Punctuated<Expr, Comma>,
}

impl Parse for WithContext {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        Ok(Self {
            context: input.parse::<Context>()?,
            keys: Punctuated::parse_terminated(input)?,
        })
    }
}
