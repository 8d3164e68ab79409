/// GraphQL Compilation Pipeline
/// 
/// This module implements the catamorphism stack that converts GraphQL multi-root
/// queries to relational plans and then to single SQL statements with CTEs.

use std::collections::HashMap;
use serde_json::Value as JsonValue;
use crate::orm::graphql::{
    MultiRoot, MultiRootF, SelectionSet, Field, SqlExpr, SqlExprF, TypeTag, BinaryOp,
    RelationalPlan, ColumnPlan, SubqueryPlan, CompiledSql, GraphQLCompiler,
};
use crate::orm::schema::{TypeSafeSchema, Column, Table};
use crate::sqlite::types::{DataType, Value};
use crate::sqlite::error::{SqlError, SqlResult};

/// Enhanced GraphQL compiler with advanced compilation strategies
pub struct AdvancedGraphQLCompiler {
    base_compiler: GraphQLCompiler,
    optimization_level: OptimizationLevel,
    schema_metadata: SchemaMetadata,
}

/// Optimization levels for query compilation
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationLevel {
    None,
    Basic,
    Aggressive,
}

/// Schema metadata for intelligent query planning
#[derive(Debug, Clone)]
pub struct SchemaMetadata {
    pub tables: HashMap<String, TableMetadata>,
    pub relationships: Vec<Relationship>,
    pub indexes: Vec<IndexMetadata>,
}

/// Table metadata for query optimization
#[derive(Debug, Clone)]
pub struct TableMetadata {
    pub name: String,
    pub columns: HashMap<String, ColumnMetadata>,
    pub primary_key: Vec<String>,
    pub estimated_rows: Option<u64>,
}

/// Column metadata
#[derive(Debug, Clone)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub unique: bool,
    pub indexed: bool,
}

/// Relationship between tables
#[derive(Debug, Clone)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    pub relationship_type: RelationshipType,
}

/// Types of relationships
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// Index metadata for optimization
#[derive(Debug, Clone)]
pub struct IndexMetadata {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub partial: bool,
}

/// Query execution plan with cost estimation
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub sql: String,
    pub binds: Vec<Value>,
    pub estimated_cost: f64,
    pub estimated_rows: u64,
    pub execution_strategy: ExecutionStrategy,
}

/// Execution strategies
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel,
    Streaming,
}

impl AdvancedGraphQLCompiler {
    /// Create a new advanced GraphQL compiler
    pub fn new(schema: TypeSafeSchema, optimization_level: OptimizationLevel) -> Self {
        let schema_metadata = SchemaMetadata::from_type_safe_schema(&schema);
        let base_compiler = GraphQLCompiler::new(schema);
        
        Self {
            base_compiler,
            optimization_level,
            schema_metadata,
        }
    }
    
    /// Compile with advanced optimizations
    pub fn compile_optimized(&self, query: MultiRoot) -> SqlResult<ExecutionPlan> {
        // Step 1: Convert to relational plans (catamorphism 1)
        let plans = self.multi_root_to_optimized_plans(query)?;
        
        // Step 2: Optimize plans based on schema metadata
        let optimized_plans = self.optimize_plans(plans)?;
        
        // Step 3: Generate optimized SQL (catamorphism 2)
        let compiled = self.plans_to_optimized_sql(optimized_plans)?;
        
        // Step 4: Create execution plan with cost estimation
        let estimated_cost = self.estimate_cost(&compiled);
        let estimated_rows = self.estimate_rows(&compiled);
        let execution_strategy = self.choose_execution_strategy(&compiled);

        Ok(ExecutionPlan {
            sql: compiled.sql,
            binds: compiled.binds,
            estimated_cost,
            estimated_rows,
            execution_strategy,
        })
    }
    
    /// Convert multi-root query to optimized relational plans
    fn multi_root_to_optimized_plans(&self, query: MultiRoot) -> SqlResult<Vec<RelationalPlan>> {
        match query {
            MultiRootF::Root { name, selection, args, .. } => {
                let plan = self.selection_to_optimized_plan(name, selection, args)?;
                Ok(vec![plan])
            },
            MultiRootF::Combine { left, right, .. } => {
                let mut left_plans = self.multi_root_to_optimized_plans(*left)?;
                let mut right_plans = self.multi_root_to_optimized_plans(*right)?;
                left_plans.append(&mut right_plans);
                Ok(left_plans)
            },
        }
    }
    
    /// Convert selection set to optimized relational plan
    fn selection_to_optimized_plan(
        &self,
        root_name: String,
        selection: SelectionSet,
        args: HashMap<String, JsonValue>,
    ) -> SqlResult<RelationalPlan> {
        let base_table = self.infer_table_from_root(&root_name)?;
        let mut columns = Vec::new();
        let mut subqueries = Vec::new();
        
        // Analyze selection for optimization opportunities
        let selection_analysis = self.analyze_selection(&selection, &base_table)?;
        
        for field in selection.fields {
            if let Some(ref nested_selection) = field.selection_set {
                // Check if this can be optimized as a JOIN instead of subquery
                if self.can_optimize_as_join(&base_table, &field.name, &selection_analysis) {
                    // Convert to JOIN-based column selection
                    let join_columns = self.convert_to_join_columns(&field, nested_selection)?;
                    columns.extend(join_columns);
                } else {
                    // Keep as subquery
                    let subquery_plan = self.selection_to_optimized_plan(
                        field.name.clone(),
                        nested_selection.clone(),
                        field.args.clone(),
                    )?;
                    
                    let field_name = field.name.clone();
                    subqueries.push(SubqueryPlan {
                        field_name: field.name,
                        query: subquery_plan,
                        join_condition: self.infer_join_condition(&base_table, &field_name)?,
                        aggregation: Some("jsonb_agg".to_string()),
                    });
                }
            } else {
                // Simple field - add to column list
                let sql_expr = if let Some(custom) = field.custom_expr {
                    custom
                } else {
                    SqlExprF::Column {
                        name: field.name.clone(),
                        table_alias: None,
                        next: (),
                    }
                };
                
                columns.push(ColumnPlan {
                    field_name: field.name,
                    sql_expr,
                    alias: field.alias,
                });
            }
        }
        
        Ok(RelationalPlan {
            root_name,
            base_table,
            columns,
            where_clause: self.build_optimized_where_clause(&args)?,
            limit: args.get("limit").and_then(|v| v.as_u64()),
            offset: args.get("offset").and_then(|v| v.as_u64()),
            subqueries,
        })
    }
    
    /// Analyze selection for optimization opportunities
    fn analyze_selection(&self, selection: &SelectionSet, base_table: &str) -> SqlResult<SelectionAnalysis> {
        let mut analysis = SelectionAnalysis {
            total_fields: selection.fields.len(),
            nested_fields: 0,
            aggregations: 0,
            custom_functions: 0,
            potential_joins: Vec::new(),
        };
        
        for field in &selection.fields {
            if field.selection_set.is_some() {
                analysis.nested_fields += 1;
                
                // Check if this can be a JOIN
                if let Some(relationship) = self.find_relationship(base_table, &field.name) {
                    analysis.potential_joins.push(relationship);
                }
            }
            
            if field.custom_expr.is_some() {
                analysis.custom_functions += 1;
            }
        }
        
        Ok(analysis)
    }
    
    /// Check if a nested field can be optimized as a JOIN
    fn can_optimize_as_join(&self, base_table: &str, field_name: &str, analysis: &SelectionAnalysis) -> bool {
        // Simple heuristic: optimize as JOIN if:
        // 1. There's a direct relationship
        // 2. The nested selection is simple (few fields, no further nesting)
        // 3. Optimization level allows it
        
        if self.optimization_level == OptimizationLevel::None {
            return false;
        }
        
        analysis.potential_joins.iter().any(|rel| {
            rel.from_table == base_table && rel.to_table == field_name
        }) && analysis.nested_fields <= 3 // Simple heuristic
    }
    
    /// Convert nested selection to JOIN-based columns
    fn convert_to_join_columns(&self, field: &Field, selection: &SelectionSet) -> SqlResult<Vec<ColumnPlan>> {
        let mut columns = Vec::new();
        
        for nested_field in &selection.fields {
            let sql_expr = SqlExprF::Column {
                name: format!("{}.{}", field.name, nested_field.name),
                table_alias: Some(field.name.clone()),
                next: (),
            };
            
            columns.push(ColumnPlan {
                field_name: format!("{}_{}", field.name, nested_field.name),
                sql_expr,
                alias: nested_field.alias.clone(),
            });
        }
        
        Ok(columns)
    }
    
    /// Build optimized WHERE clause from arguments
    fn build_optimized_where_clause(&self, args: &HashMap<String, JsonValue>) -> SqlResult<Option<SqlExpr>> {
        let mut conditions = Vec::new();
        
        for (key, value) in args {
            if key == "limit" || key == "offset" {
                continue; // These are handled separately
            }
            
            let condition = match key.as_str() {
                "where" => {
                    // Parse complex where conditions
                    self.parse_where_condition(value)?
                },
                _ => {
                    // Simple equality condition
                    SqlExprF::Binary {
                        op: BinaryOp::Eq,
                        left: Box::new(SqlExprF::Column {
                            name: key.clone(),
                            table_alias: None,
                            next: (),
                        }),
                        right: Box::new(SqlExprF::Literal {
                            value: value.clone(),
                            ty: self.infer_type_from_json(value),
                            next: (),
                        }),
                        next: (),
                    }
                },
            };
            
            conditions.push(condition);
        }
        
        if conditions.is_empty() {
            Ok(None)
        } else if conditions.len() == 1 {
            Ok(Some(conditions.into_iter().next().unwrap()))
        } else {
            // Combine with AND
            let mut conditions_iter = conditions.into_iter();
            let mut result = conditions_iter.next().unwrap();
            for condition in conditions_iter {
                result = SqlExprF::Binary {
                    op: BinaryOp::And,
                    left: Box::new(result),
                    right: Box::new(condition),
                    next: (),
                };
            }
            Ok(Some(result))
        }
    }
    
    /// Parse complex WHERE condition from JSON
    fn parse_where_condition(&self, value: &JsonValue) -> SqlResult<SqlExpr> {
        // Simplified implementation - would need full expression parser
        match value {
            JsonValue::Object(obj) => {
                if let Some(field) = obj.get("field") {
                    if let Some(op) = obj.get("op") {
                        if let Some(val) = obj.get("value") {
                            let binary_op = match op.as_str().unwrap_or("eq") {
                                "eq" => BinaryOp::Eq,
                                "ne" => BinaryOp::Ne,
                                "lt" => BinaryOp::Lt,
                                "le" => BinaryOp::Le,
                                "gt" => BinaryOp::Gt,
                                "ge" => BinaryOp::Ge,
                                _ => BinaryOp::Eq,
                            };
                            
                            return Ok(SqlExprF::Binary {
                                op: binary_op,
                                left: Box::new(SqlExprF::Column {
                                    name: field.as_str().unwrap_or("id").to_string(),
                                    table_alias: None,
                                    next: (),
                                }),
                                right: Box::new(SqlExprF::Literal {
                                    value: val.clone(),
                                    ty: self.infer_type_from_json(val),
                                    next: (),
                                }),
                                next: (),
                            });
                        }
                    }
                }
            },
            _ => {},
        }
        
        Err(SqlError::runtime_error("Invalid WHERE condition format"))
    }
    
    /// Infer TypeTag from JSON value
    fn infer_type_from_json(&self, value: &JsonValue) -> TypeTag {
        match value {
            JsonValue::String(_) => TypeTag::Text,
            JsonValue::Number(n) => {
                if n.is_i64() {
                    TypeTag::Integer
                } else {
                    TypeTag::Real
                }
            },
            JsonValue::Bool(_) => TypeTag::Boolean,
            JsonValue::Array(_) => TypeTag::Array(Box::new(TypeTag::Json)),
            JsonValue::Object(_) => TypeTag::Json,
            JsonValue::Null => TypeTag::Text, // Default
        }
    }
    
    /// Optimize relational plans
    fn optimize_plans(&self, plans: Vec<RelationalPlan>) -> SqlResult<Vec<RelationalPlan>> {
        match self.optimization_level {
            OptimizationLevel::None => Ok(plans),
            OptimizationLevel::Basic => self.apply_basic_optimizations(plans),
            OptimizationLevel::Aggressive => self.apply_aggressive_optimizations(plans),
        }
    }
    
    /// Apply basic optimizations
    fn apply_basic_optimizations(&self, plans: Vec<RelationalPlan>) -> SqlResult<Vec<RelationalPlan>> {
        // Basic optimizations: predicate pushdown, column pruning
        let mut optimized = Vec::new();
        
        for plan in plans {
            let mut opt_plan = plan;
            
            // Push down WHERE clauses to subqueries where possible
            opt_plan = self.push_down_predicates(opt_plan)?;
            
            // Remove unused columns
            opt_plan = self.prune_columns(opt_plan)?;
            
            optimized.push(opt_plan);
        }
        
        Ok(optimized)
    }
    
    /// Apply aggressive optimizations
    fn apply_aggressive_optimizations(&self, plans: Vec<RelationalPlan>) -> SqlResult<Vec<RelationalPlan>> {
        let mut optimized = self.apply_basic_optimizations(plans)?;
        
        // Additional aggressive optimizations
        for plan in &mut optimized {
            // Convert subqueries to JOINs where beneficial
            *plan = self.convert_subqueries_to_joins(plan.clone())?;
            
            // Reorder operations for better performance
            *plan = self.reorder_operations(plan.clone())?;
        }
        
        Ok(optimized)
    }
    
    /// Helper methods for optimization (simplified implementations)
    fn push_down_predicates(&self, plan: RelationalPlan) -> SqlResult<RelationalPlan> {
        // Simplified: just return the plan as-is
        Ok(plan)
    }
    
    fn prune_columns(&self, plan: RelationalPlan) -> SqlResult<RelationalPlan> {
        // Simplified: just return the plan as-is
        Ok(plan)
    }
    
    fn convert_subqueries_to_joins(&self, plan: RelationalPlan) -> SqlResult<RelationalPlan> {
        // Simplified: just return the plan as-is
        Ok(plan)
    }
    
    fn reorder_operations(&self, plan: RelationalPlan) -> SqlResult<RelationalPlan> {
        // Simplified: just return the plan as-is
        Ok(plan)
    }
    
    /// Generate optimized SQL from plans
    fn plans_to_optimized_sql(&self, plans: Vec<RelationalPlan>) -> SqlResult<CompiledSql> {
        // Use the base compiler's SQL generation with some optimizations
        self.base_compiler.plans_to_sql(plans)
    }
    
    /// Estimate query cost
    fn estimate_cost(&self, compiled: &CompiledSql) -> f64 {
        // Simplified cost estimation based on SQL complexity
        let sql_length = compiled.sql.len() as f64;
        let bind_count = compiled.binds.len() as f64;
        
        // Basic heuristic: longer SQL and more binds = higher cost
        sql_length * 0.1 + bind_count * 10.0
    }
    
    /// Estimate result rows
    fn estimate_rows(&self, compiled: &CompiledSql) -> u64 {
        // Simplified estimation
        if compiled.sql.contains("LIMIT") {
            // Try to extract LIMIT value
            100 // Default estimate
        } else {
            1000 // Default estimate for unlimited queries
        }
    }
    
    /// Choose execution strategy
    fn choose_execution_strategy(&self, compiled: &CompiledSql) -> ExecutionStrategy {
        if compiled.sql.contains("WITH") && compiled.sql.matches("WITH").count() > 2 {
            ExecutionStrategy::Parallel
        } else if self.estimate_rows(compiled) > 10000 {
            ExecutionStrategy::Streaming
        } else {
            ExecutionStrategy::Sequential
        }
    }
    
    /// Helper methods from base compiler
    fn infer_table_from_root(&self, root_name: &str) -> SqlResult<String> {
        self.base_compiler.infer_table_from_root(root_name)
    }
    
    fn infer_join_condition(&self, base_table: &str, field_name: &str) -> SqlResult<SqlExpr> {
        self.base_compiler.infer_join_condition(base_table, field_name)
    }
    
    fn find_relationship(&self, from_table: &str, to_table: &str) -> Option<Relationship> {
        self.schema_metadata.relationships.iter()
            .find(|rel| rel.from_table == from_table && rel.to_table == to_table)
            .cloned()
    }
}

/// Analysis result for selection optimization
#[derive(Debug, Clone)]
struct SelectionAnalysis {
    total_fields: usize,
    nested_fields: usize,
    aggregations: usize,
    custom_functions: usize,
    potential_joins: Vec<Relationship>,
}

impl SchemaMetadata {
    /// Create schema metadata from TypeSafeSchema
    fn from_type_safe_schema(_schema: &TypeSafeSchema) -> Self {
        // Simplified implementation - would introspect the actual schema
        Self {
            tables: HashMap::new(),
            relationships: Vec::new(),
            indexes: Vec::new(),
        }
    }
}
