use darling::{ast, Error, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(table), supports(struct_named))]
struct TableRowReceiver {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<(), ColumnReceiver>,
}

#[derive(Debug, FromField)]
#[darling(attributes(table))]
struct ColumnReceiver {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    /// Column header shown to users, defaults to the field name in title case
    #[darling(default)]
    header: Option<String>,
    /// One of `plain`, `integer`, `decimal`, `percent`, `currency`
    #[darling(default)]
    format: Option<String>,
    #[darling(default)]
    search: bool,
    #[darling(default)]
    skip: bool,
}

fn title_case(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_variant(format: Option<&str>) -> Result<syn::Ident, String> {
    let variant = match format.unwrap_or("plain") {
        "plain" => "Plain",
        "integer" => "Integer",
        "decimal" => "Decimal",
        "percent" => "Percent",
        "currency" => "Currency",
        other => return Err(format!("unknown column format `{other}`")),
    };
    Ok(format_ident!("{}", variant))
}

impl TableRowReceiver {
    fn expand(&self) -> Result<TokenStream, Error> {
        let Self {
            ident,
            generics,
            data,
        } = self;
        let (imp, ty, wher) = generics.split_for_impl();
        let fields = data
            .as_ref()
            .take_struct()
            .expect("darling only accepts named structs here")
            .fields;

        let mut errors = Error::accumulator();
        let mut column_defs = Vec::new();
        let mut cell_arms = Vec::new();
        for field in fields.into_iter().filter(|field| !field.skip) {
            let Some(field_ident) = field.ident.as_ref() else {
                continue;
            };
            let key = field_ident.to_string();
            let header = field.header.clone().unwrap_or_else(|| title_case(&key));
            let Some(variant) = errors.handle(
                format_variant(field.format.as_deref())
                    .map_err(|message| Error::custom(message).with_span(field_ident)),
            ) else {
                continue;
            };
            let field_ty = &field.ty;
            let searchable = field.search;
            column_defs.push(quote! {
                ::result_table::ColumnDef {
                    key: #key,
                    header: #header,
                    kind: <#field_ty as ::result_table::ToCell>::KIND,
                    format: ::result_table::CellFormat::#variant,
                    searchable: #searchable,
                },
            });
            cell_arms.push(quote! {
                #key => ::core::option::Option::Some(::result_table::ToCell::to_cell(&self.#field_ident)),
            });
        }
        errors.finish()?;

        Ok(quote! {
            impl #imp ::result_table::TableRow for #ident #ty #wher {
                const COLUMNS: &'static [::result_table::ColumnDef] = &[#(#column_defs)*];

                fn cell(&self, key: &str) -> ::core::option::Option<::result_table::Cell> {
                    match key {
                        #(#cell_arms)*
                        _ => ::core::option::Option::None,
                    }
                }
            }
        })
    }
}

#[proc_macro_derive(TableRow, attributes(table))]
pub fn table_row(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let receiver = match TableRowReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(e) => return e.write_errors().into(),
    };
    match receiver.expand() {
        Ok(tokens) => tokens.into(),
        Err(e) => e.write_errors().into(),
    }
}
