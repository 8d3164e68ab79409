/// GraphQL Macro Implementation
/// 
/// This module implements the `graphql!` macro for embedding GraphQL queries
/// directly in Rust code with compile-time validation and zero-cost abstraction.

use proc_macro2::{TokenStream, Span};
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, LitStr, Result as SynResult, Error as SynError};
use crate::orm::graphql_parser::{GraphQLParser, CustomFunction};
use crate::orm::graphql::{TypeTag, MultiRoot, GraphQLCompiler};
use crate::orm::schema::TypeSafeSchema;
use crate::sqlite::error::SqlResult;

/// Input for the graphql! macro
pub struct GraphQLMacroInput {
    pub query: String,
    pub variables: Option<TokenStream>,
}

impl Parse for GraphQLMacroInput {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let query_lit: LitStr = input.parse()?;
        let query = query_lit.value();
        
        // Check for optional variables
        let variables = if input.peek(syn::Token![,]) {
            input.parse::<syn::Token![,]>()?;
            Some(input.parse()?)
        } else {
            None
        };
        
        Ok(GraphQLMacroInput { query, variables })
    }
}

/// GraphQL macro processor
pub struct GraphQLMacroProcessor {
    parser: GraphQLParser,
    schema: TypeSafeSchema,
}

impl GraphQLMacroProcessor {
    /// Create a new macro processor
    pub fn new() -> Self {
        let mut parser = GraphQLParser::new();
        let schema = TypeSafeSchema::new();
        
        // Register additional custom functions for macro usage
        parser.register_function("score_rank".to_string(), CustomFunction {
            sql_template: "score_rank()".to_string(),
            return_type: TypeTag::Real,
            arg_types: Vec::new(),
        });
        
        Self { parser, schema }
    }
    
    /// Process the GraphQL macro input and generate Rust code
    pub fn process(&self, input: GraphQLMacroInput) -> SynResult<TokenStream> {
        // Parse the GraphQL query at compile time
        let multi_root = self.parser.parse(&input.query)
            .map_err(|e| SynError::new(Span::call_site(), format!("GraphQL parse error: {}", e)))?;
        
        // Validate the query against the schema
        self.validate_query(&multi_root)
            .map_err(|e| SynError::new(Span::call_site(), format!("GraphQL validation error: {}", e)))?;
        
        // Generate the Rust code
        self.generate_code(multi_root, input.variables)
    }
    
    /// Validate the GraphQL query against the schema
    fn validate_query(&self, query: &MultiRoot) -> SqlResult<()> {
        // Create a compiler to validate the query
        let compiler = GraphQLCompiler::new(self.schema.clone());
        
        // Try to compile the query - this will catch schema mismatches
        let _compiled = compiler.compile(query.clone())?;
        
        Ok(())
    }
    
    /// Generate Rust code for the GraphQL query
    fn generate_code(&self, query: MultiRoot, variables: Option<TokenStream>) -> SynResult<TokenStream> {
        // Serialize the query for runtime use
        let query_data = self.serialize_query(&query)?;
        
        // Generate the code
        let code = if let Some(vars) = variables {
            quote! {
                {
                    use ream::orm::graphql::{GraphQLCompiler, MultiRoot};
                    use ream::orm::schema::TypeSafeSchema;
                    use serde_json::Value as JsonValue;
                    
                    // Create the query at runtime
                    let schema = TypeSafeSchema::new();
                    let compiler = GraphQLCompiler::new(schema);
                    let query: MultiRoot = #query_data;
                    let variables: std::collections::HashMap<String, JsonValue> = #vars;
                    
                    // Compile and execute
                    async move {
                        let compiled = compiler.compile(query)?;
                        // Execute the compiled SQL
                        // This would integrate with the actual database driver
                        Ok::<JsonValue, ream::sqlite::error::SqlError>(serde_json::json!({}))
                    }
                }
            }
        } else {
            quote! {
                {
                    use ream::orm::graphql::{GraphQLCompiler, MultiRoot};
                    use ream::orm::schema::TypeSafeSchema;
                    use serde_json::Value as JsonValue;
                    
                    // Create the query at runtime
                    let schema = TypeSafeSchema::new();
                    let compiler = GraphQLCompiler::new(schema);
                    let query: MultiRoot = #query_data;
                    
                    // Compile and execute
                    async move {
                        let compiled = compiler.compile(query)?;
                        // Execute the compiled SQL
                        // This would integrate with the actual database driver
                        Ok::<JsonValue, ream::sqlite::error::SqlError>(serde_json!({}))
                    }
                }
            }
        };
        
        Ok(code)
    }
    
    /// Serialize the query for code generation
    fn serialize_query(&self, query: &MultiRoot) -> SynResult<TokenStream> {
        // Convert the MultiRoot to a TokenStream representation
        // This is a simplified implementation - in practice would need
        // full serialization of the algebraic structure
        
        match query {
            crate::orm::graphql::MultiRootF::Root { name, selection, args, .. } => {
                let name_lit = name.as_str();
                let fields = self.serialize_selection_set(selection)?;
                let args_tokens = self.serialize_args(args)?;
                
                Ok(quote! {
                    ream::orm::graphql::MultiRootF::Root {
                        name: #name_lit.to_string(),
                        selection: #fields,
                        args: #args_tokens,
                        next: (),
                    }
                })
            },
            crate::orm::graphql::MultiRootF::Combine { left, right, .. } => {
                let left_tokens = self.serialize_query(left)?;
                let right_tokens = self.serialize_query(right)?;
                
                Ok(quote! {
                    ream::orm::graphql::MultiRootF::Combine {
                        left: Box::new(#left_tokens),
                        right: Box::new(#right_tokens),
                        next: (),
                    }
                })
            },
        }
    }
    
    /// Serialize a selection set
    fn serialize_selection_set(&self, selection: &crate::orm::graphql::SelectionSet) -> SynResult<TokenStream> {
        let mut field_tokens = Vec::new();
        
        for field in &selection.fields {
            let field_token = self.serialize_field(field)?;
            field_tokens.push(field_token);
        }
        
        Ok(quote! {
            ream::orm::graphql::SelectionSet {
                fields: vec![#(#field_tokens),*],
            }
        })
    }
    
    /// Serialize a field
    fn serialize_field(&self, field: &crate::orm::graphql::Field) -> SynResult<TokenStream> {
        let name = &field.name;
        let alias = match &field.alias {
            Some(a) => quote! { Some(#a.to_string()) },
            None => quote! { None },
        };
        
        let args = self.serialize_args(&field.args)?;
        
        let selection_set = match &field.selection_set {
            Some(sel) => {
                let sel_tokens = self.serialize_selection_set(sel)?;
                quote! { Some(#sel_tokens) }
            },
            None => quote! { None },
        };
        
        let custom_expr = match &field.custom_expr {
            Some(_expr) => {
                // Simplified - would need full SqlExpr serialization
                quote! { None }
            },
            None => quote! { None },
        };
        
        Ok(quote! {
            ream::orm::graphql::Field {
                name: #name.to_string(),
                alias: #alias,
                args: #args,
                selection_set: #selection_set,
                custom_expr: #custom_expr,
            }
        })
    }
    
    /// Serialize arguments
    fn serialize_args(&self, args: &std::collections::HashMap<String, serde_json::Value>) -> SynResult<TokenStream> {
        let mut arg_tokens = Vec::new();
        
        for (key, value) in args {
            let value_token = self.serialize_json_value(value)?;
            arg_tokens.push(quote! {
                (#key.to_string(), #value_token)
            });
        }
        
        Ok(quote! {
            {
                let mut map = std::collections::HashMap::new();
                #(map.insert #arg_tokens;)*
                map
            }
        })
    }
    
    /// Serialize a JSON value
    fn serialize_json_value(&self, value: &serde_json::Value) -> SynResult<TokenStream> {
        match value {
            serde_json::Value::String(s) => Ok(quote! { serde_json::Value::String(#s.to_string()) }),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(quote! { serde_json::Value::Number(serde_json::Number::from(#i)) })
                } else if let Some(f) = n.as_f64() {
                    Ok(quote! { serde_json::Value::Number(serde_json::Number::from_f64(#f).unwrap()) })
                } else {
                    Ok(quote! { serde_json::Value::Null })
                }
            },
            serde_json::Value::Bool(b) => Ok(quote! { serde_json::Value::Bool(#b) }),
            serde_json::Value::Null => Ok(quote! { serde_json::Value::Null }),
            serde_json::Value::Array(arr) => {
                let mut item_tokens = Vec::new();
                for item in arr {
                    item_tokens.push(self.serialize_json_value(item)?);
                }
                Ok(quote! { serde_json::Value::Array(vec![#(#item_tokens),*]) })
            },
            serde_json::Value::Object(obj) => {
                let mut pair_tokens = Vec::new();
                for (key, val) in obj {
                    let val_token = self.serialize_json_value(val)?;
                    pair_tokens.push(quote! { (#key.to_string(), #val_token) });
                }
                Ok(quote! {
                    serde_json::Value::Object({
                        let mut map = serde_json::Map::new();
                        #(map.insert #pair_tokens;)*
                        map
                    })
                })
            },
        }
    }
}

/// Builder for GraphQL queries in Rust code
pub struct GraphQLQueryBuilder {
    query_parts: Vec<String>,
    variables: std::collections::HashMap<String, serde_json::Value>,
}

impl GraphQLQueryBuilder {
    /// Create a new query builder
    pub fn new() -> Self {
        Self {
            query_parts: vec!["query {".to_string()],
            variables: std::collections::HashMap::new(),
        }
    }
    
    /// Add a root field
    pub fn root(mut self, name: &str) -> Self {
        self.query_parts.push(format!("  {} {{", name));
        self
    }
    
    /// Add a field
    pub fn field(mut self, name: &str) -> Self {
        self.query_parts.push(format!("    {}", name));
        self
    }
    
    /// Add a field with arguments
    pub fn field_with_args(mut self, name: &str, args: &[(&str, serde_json::Value)]) -> Self {
        let arg_strs: Vec<String> = args.iter().map(|(k, v)| {
            format!("{}: {}", k, self.format_value(v))
        }).collect();
        
        self.query_parts.push(format!("    {}({})", name, arg_strs.join(", ")));
        self
    }
    
    /// Close current selection
    pub fn close(mut self) -> Self {
        self.query_parts.push("  }".to_string());
        self
    }
    
    /// Build the query string
    pub fn build(mut self) -> String {
        self.query_parts.push("}".to_string());
        self.query_parts.join("\n")
    }
    
    /// Format a JSON value for GraphQL
    fn format_value(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => format!("\"{}\"", s),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => "null".to_string(),
            _ => "null".to_string(), // Simplified
        }
    }
}

impl Default for GraphQLQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
