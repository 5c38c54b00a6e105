//! Derive macros for the lavafall-solver framework

use proc_macro::TokenStream;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, Attribute, DeriveInput, LitInt, LitStr};

/// Implements `Solver` by dispatching `solve_part(shared, n)` to
/// `<Self as PartSolver<n>>::solve` for every `n` in `1..=max_parts`.
///
/// Part numbers without a matching arm return
/// `SolveError::PartNotImplemented`.
///
/// ```ignore
/// #[derive(AocSolver)]
/// #[aoc_solver(max_parts = 2)]
/// pub struct Day10;
/// ```
#[proc_macro_derive(AocSolver, attributes(aoc_solver))]
pub fn derive_aoc_solver(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_aoc_solver(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Submits the solver to the plugin inventory so
/// `SolverRegistryBuilder::register_all_plugins` picks it up.
///
/// # Attributes
///
/// - `year`, `day`: required
/// - `tags`: optional list of string literals used for filtering
///
/// ```ignore
/// #[derive(AocSolver, AutoRegisterSolver)]
/// #[aoc_solver(max_parts = 2)]
/// #[aoc(year = 2023, day = 10, tags = ["grid", "loop"])]
/// pub struct Day10;
/// ```
///
/// The type must implement `Solver`; otherwise the expansion fails with an
/// unsatisfied `MustImplementSolver` bound pointing at the type.
#[proc_macro_derive(AutoRegisterSolver, attributes(aoc))]
pub fn derive_auto_register_solver(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_auto_register(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn find_attr<'a>(input: &'a DeriveInput, name: &str) -> syn::Result<&'a Attribute> {
    input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident(name))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                format!("missing #[{name}(...)] attribute"),
            )
        })
}

fn expand_aoc_solver(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let attr = find_attr(input, "aoc_solver")?;

    let mut max_parts: Option<u8> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("max_parts") {
            let lit: LitInt = meta.value()?.parse()?;
            max_parts = Some(lit.base10_parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `max_parts = <1..=25>`"))
        }
    })?;

    let max_parts = match max_parts {
        Some(n @ 1..=25) => n,
        Some(_) => {
            return Err(syn::Error::new_spanned(
                attr,
                "max_parts must be between 1 and 25",
            ));
        }
        None => return Err(syn::Error::new_spanned(attr, "missing `max_parts`")),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let parts_lit = Literal::u8_unsuffixed(max_parts);
    let arms = (1..=max_parts).map(|n| {
        let n = Literal::u8_unsuffixed(n);
        quote! {
            #n => <Self as ::lavafall_solver::PartSolver<#n>>::solve(shared),
        }
    });

    Ok(quote! {
        impl #impl_generics ::lavafall_solver::Solver for #name #ty_generics #where_clause {
            const PARTS: u8 = #parts_lit;

            fn solve_part(
                shared: &mut <Self as ::lavafall_solver::AocParser>::SharedData<'_>,
                part: u8,
            ) -> ::core::result::Result<::std::string::String, ::lavafall_solver::SolveError> {
                match part {
                    #(#arms)*
                    _ => ::core::result::Result::Err(
                        ::lavafall_solver::SolveError::PartNotImplemented(part),
                    ),
                }
            }
        }
    })
}

fn expand_auto_register(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let attr = find_attr(input, "aoc")?;

    let mut year: Option<u16> = None;
    let mut day: Option<u8> = None;
    let mut tags: Vec<LitStr> = Vec::new();

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("year") {
            let lit: LitInt = meta.value()?.parse()?;
            year = Some(lit.base10_parse()?);
        } else if meta.path.is_ident("day") {
            let lit: LitInt = meta.value()?.parse()?;
            day = Some(lit.base10_parse()?);
        } else if meta.path.is_ident("tags") {
            // tags = ["a", "b"]
            let _eq = meta.value()?;
            let content;
            syn::bracketed!(content in meta.input);
            let list = content.parse_terminated(|stream| stream.parse::<LitStr>(), syn::Token![,])?;
            tags.extend(list);
        } else {
            return Err(meta.error("expected `year`, `day` or `tags`"));
        }
        Ok(())
    })?;

    let year = year.ok_or_else(|| syn::Error::new_spanned(attr, "missing `year`"))?;
    let day = match day {
        Some(d @ 1..=25) => d,
        Some(_) => return Err(syn::Error::new_spanned(attr, "day must be between 1 and 25")),
        None => return Err(syn::Error::new_spanned(attr, "missing `day`")),
    };

    let name = &input.ident;
    let year = Literal::u16_unsuffixed(year);
    let day = Literal::u8_unsuffixed(day);

    Ok(quote! {
        const _: () = {
            trait MustImplementSolver: ::lavafall_solver::Solver {}
            impl MustImplementSolver for #name {}
        };

        ::lavafall_solver::inventory::submit! {
            ::lavafall_solver::SolverPlugin {
                year: #year,
                day: #day,
                solver: &#name,
                tags: &[#(#tags),*],
            }
        }
    })
}
