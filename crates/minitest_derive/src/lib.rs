//! Procedural macros for the minitest runner.
//!
//! These macros do work that has to happen on syntax rather than on values:
//! - `check!`: picks the assertion an expression implies *before* it is evaluated
//! - `check_raises!`: wraps an expression in the inverse assertion
//! - `#[suite]`: scans a module's declared functions and generates its namespace constructor
//!
//! Expansions refer to the runtime through `::minitest::...` paths, so the calling crate must
//! depend on `minitest`.

use minitest_core::TEST_PREFIX;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{BinOp, Expr, ExprBinary, Item, ItemMod, ReturnType, Signature, Token, Type, parse_macro_input};

/// Assert an expression, dispatching on its shape.
///
/// A two-operand `==` comparison becomes `assert_equal(&left, &right)`, so a failure reports both
/// operands. Every other expression becomes `assert_true(expr)`; a borrowed `&bool` must be
/// dereferenced (`check!(*flag)`). Surrounding parentheses are looked through. The expansion ends in `?`, so it can only be used inside a function returning a
/// `Result` whose error converts from `TestFailure` (such as `minitest::CaseResult`).
///
/// # Example
/// ```ignore
/// fn test_math() -> minitest::CaseResult {
///     check!(2 + 2 == 4);      // assert_equal(&(2 + 2), &(4))?
///     check!(1 < 2);           // assert_true(1 < 2)?
///     Ok(())
/// }
/// ```
#[proc_macro]
pub fn check(input: TokenStream) -> TokenStream {
    let expr = parse_macro_input!(input as Expr);
    TokenStream::from(expand_check(&expr))
}

/// Assert that evaluating a `Result`-valued expression fails with a given error type.
///
/// Expands to `assert_raises::<Type, ..>(|| expr)?` and evaluates to the matched error value.
///
/// # Example
/// ```ignore
/// let err = check_raises!(std::num::ParseIntError, "x".parse::<i32>());
/// ```
#[proc_macro]
pub fn check_raises(input: TokenStream) -> TokenStream {
    let CheckRaises { ty, expr } = parse_macro_input!(input as CheckRaises);
    let expanded = quote! {
        ::minitest::assert_raises::<#ty, _, _, _>(|| #expr)?
    };
    TokenStream::from(expanded)
}

/// Turn an inline module into a test namespace.
///
/// Every `test_`-prefixed function in the module that takes no arguments, is neither generic nor
/// async, and returns `()` or a `Result`-named type is bound, in declaration order, into the
/// namespace returned by a generated `pub fn namespace() -> ::minitest::Namespace`. Other functions
/// are left alone, so helpers and fixtures may return any type.
///
/// # Example
/// ```ignore
/// #[minitest::suite]
/// mod math {
///     use minitest::{CaseResult, check};
///
///     fn test_add() -> CaseResult {
///         check!(1 + 1 == 2);
///         Ok(())
///     }
/// }
///
/// // Generates inside `math`:
/// pub fn namespace() -> ::minitest::Namespace {
///     let mut namespace = ::minitest::Namespace::new(module_path!());
///     namespace.bind("test_add", test_add);
///     namespace
/// }
/// ```
#[proc_macro_attribute]
pub fn suite(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = TokenStream2::from(attr);
        return syn::Error::new_spanned(attr, "#[suite] takes no arguments")
            .to_compile_error()
            .into();
    }
    let module = parse_macro_input!(item as ItemMod);
    match expand_suite(module) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

struct CheckRaises {
    ty: Type,
    expr: Expr,
}

impl Parse for CheckRaises {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let ty: Type = input.parse()?;
        input.parse::<Token![,]>()?;
        let expr: Expr = input.parse()?;
        // Allow a trailing comma.
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        Ok(CheckRaises { ty, expr })
    }
}

/// Look through parentheses and the invisible groups `macro_rules!` wraps `$e:expr` in.
fn strip_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(inner) => strip_parens(&inner.expr),
        Expr::Group(inner) => strip_parens(&inner.expr),
        other => other,
    }
}

fn expand_check(expr: &Expr) -> TokenStream2 {
    match strip_parens(expr) {
        Expr::Binary(ExprBinary {
            left,
            op: BinOp::Eq(_),
            right,
            ..
        }) => quote! {
            ::minitest::assert_equal(&(#left), &(#right))?
        },
        other => quote! {
            ::minitest::assert_true(#other)?
        },
    }
}

fn expand_suite(mut module: ItemMod) -> syn::Result<TokenStream2> {
    let Some((brace, mut items)) = module.content.take() else {
        return Err(syn::Error::new_spanned(
            &module,
            "#[suite] needs an inline module body (`mod name { ... }`)",
        ));
    };

    let binds: Vec<TokenStream2> = items
        .iter()
        .filter_map(|item| match item {
            Item::Fn(func) if is_case_candidate(&func.sig) => Some(&func.sig.ident),
            _ => None,
        })
        .map(|ident| {
            let name = ident.to_string();
            quote! { namespace.bind(#name, #ident); }
        })
        .collect();

    items.push(syn::parse_quote! {
        /// Namespace holding the zero-argument functions declared in this module, in order.
        pub fn namespace() -> ::minitest::Namespace {
            let mut namespace = ::minitest::Namespace::new(module_path!());
            #(#binds)*
            namespace
        }
    });
    module.content = Some((brace, items));

    Ok(quote!(#module))
}

fn is_case_candidate(sig: &Signature) -> bool {
    sig.ident.to_string().starts_with(TEST_PREFIX)
        && sig.inputs.is_empty()
        && sig.generics.params.is_empty()
        && sig.asyncness.is_none()
        && returns_unit_or_result(&sig.output)
}

fn returns_unit_or_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Default => true,
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Tuple(tuple) => tuple.elems.is_empty(),
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|seg| seg.ident.to_string().ends_with("Result")),
            _ => false,
        },
    }
}
