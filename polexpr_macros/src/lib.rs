use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Type};

fn formatted_arg_error_msg(arg_name: &str, arg_pos: usize, fn_name: &str) -> String {
    format!(
        "Expected argument {} ('{}') of {} to be f64, or a lone &[f64] for variadic operations",
        arg_pos, arg_name, fn_name
    )
}

fn is_f64(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path.qself.is_none() && type_path.path.is_ident("f64"))
}

fn is_f64_slice(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) if reference.mutability.is_none() => {
            matches!(&*reference.elem, Type::Slice(slice) if is_f64(&slice.elem))
        }
        _ => false,
    }
}

/// Lifts a numeric kernel into the uniform `fn(&[f64]) -> f64` shape used by
/// the operation registry.
///
/// `fn atan2(y: f64, x: f64) -> f64` becomes `fn atan2(args: &[f64]) -> f64`
/// reading `y` from `args[0]` and `x` from `args[1]`. A kernel declared with a
/// single `&[f64]` parameter is variadic and receives the whole slice.
///
/// Callers are expected to have checked the operand count already.
#[proc_macro_attribute]
pub fn operation(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let fn_attrs = &input.attrs;
    let fn_vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_args = &input.sig.inputs;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;

    let mut scalars = Vec::new();
    let mut rest = None;

    for (i, arg) in fn_args.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return Err(syn::Error::new(
                arg.span(),
                "operations are free functions and cannot take `self`",
            ));
        };
        let arg_name = match **pat {
            syn::Pat::Ident(ref ident) => ident.ident.clone(),
            _ => return Err(syn::Error::new(pat.span(), "Unsupported pattern")),
        };

        if is_f64(ty) {
            scalars.push(arg_name);
        } else if is_f64_slice(ty) && fn_args.len() == 1 {
            rest = Some(arg_name);
        } else {
            let msg = formatted_arg_error_msg(&arg_name.to_string(), i, &fn_name.to_string());
            return Err(syn::Error::new(ty.span(), msg));
        }
    }

    let extraction = match rest {
        Some(items) => quote! {
            let #items: &[f64] = args;
        },
        None => {
            let arity = scalars.len();
            let indices = 0..arity;
            let fn_label = fn_name.to_string();
            quote! {
                debug_assert_eq!(
                    args.len(),
                    #arity,
                    "operation `{}` called with the wrong number of operands",
                    #fn_label
                );
                #(let #scalars: f64 = args[#indices];)*
            }
        }
    };

    Ok(quote! {
        #(#fn_attrs)*
        #fn_vis fn #fn_name(args: &[f64]) #fn_output {
            #extraction
            #fn_body
        }
    })
}
