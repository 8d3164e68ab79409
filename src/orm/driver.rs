/// Driver coalgebra - Database driver interface
/// 
/// This module implements drivers as coalgebraic interfaces:
/// - Driver trait defines the observation function
/// - Coalgebra allows observing SQL and producing results
/// - Multiple driver implementations for different databases
/// - Async interface for non-blocking database operations

use async_trait::async_trait;
use std::collections::HashMap;
use crate::sqlite::types::Value;
use crate::orm::{Schema, SqlResult};
use crate::sqlite::error::SqlError;

/// Driver trait - coalgebraic interface for database operations
/// 
/// A coalgebra is a structure (A, α) where:
/// - A is the state space (driver state)
/// - α: A → F(A) is the coalgebra morphism (observation function)
#[async_trait]
pub trait Driver: Send + Sync {
    /// The effect type produced by this driver
    type Row: Send + Sync;
    
    /// Observation function: SQL string → effectful result
    /// This is the core coalgebraic operation
    async fn observe(&self, sql: &str, binds: &[Value]) -> SqlResult<Vec<Self::Row>>;
    
    /// Migration coalgebra: Schema → Effect<()>
    /// Applies schema changes to the database
    async fn migrate(&self, schema: &Schema) -> SqlResult<()>;
    
    /// Begin a transaction
    async fn begin_transaction(&self) -> SqlResult<Box<dyn Transaction>>;
    
    /// Check if the driver is connected and healthy
    async fn health_check(&self) -> SqlResult<bool>;
    
    /// Get driver metadata
    fn metadata(&self) -> DriverMetadata;
}

/// Transaction trait for managing database transactions
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Execute SQL within the transaction
    async fn execute(&mut self, sql: &str, binds: &[Value]) -> SqlResult<u64>;
    
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> SqlResult<()>;
    
    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> SqlResult<()>;
}

/// Driver metadata
#[derive(Debug, Clone)]
pub struct DriverMetadata {
    pub name: String,
    pub version: String,
    pub database_type: DatabaseType,
    pub supports_transactions: bool,
    pub supports_foreign_keys: bool,
    pub supports_json: bool,
}

/// Database type enumeration
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseType {
    SQLite,
    PostgreSQL,
    MySQL,
    Custom(String),
}

/// SQLite driver implementation
pub struct SqliteDriver {
    connection_string: String,
    // Connection pool would be added here in a real implementation
    // For now, we simulate database operations
}

impl SqliteDriver {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }
    
    pub async fn connect(connection_string: impl Into<String>) -> SqlResult<Self> {
        let driver = Self::new(connection_string);
        // In a real implementation, this would establish a connection pool
        // and verify connectivity to the SQLite database
        println!("Connected to SQLite database: {}", driver.connection_string);
        Ok(driver)
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    type Row = SqliteRow;
    
    async fn observe(&self, sql: &str, binds: &[Value]) -> SqlResult<Vec<Self::Row>> {
        // Simulate SQLite query execution
        // In a real implementation, this would:
        // 1. Get connection from pool
        // 2. Prepare statement with bindings
        // 3. Execute query and collect results
        // 4. Convert results to SqliteRow format

        println!("SQLite executing: {} with binds: {:?}", sql, binds);

        // Simulate some results based on query type
        if sql.to_uppercase().starts_with("SELECT") {
            // Return mock data for SELECT queries
            let mock_row = SqliteRow {
                columns: vec!["id".to_string(), "name".to_string()],
                values: vec![Value::Integer(1), Value::Text("Mock User".to_string())],
            };
            Ok(vec![mock_row])
        } else {
            // For non-SELECT queries, return empty result
            Ok(Vec::new())
        }
    }
    
    async fn migrate(&self, schema: &Schema) -> SqlResult<()> {
        // Generate and execute DDL statements from schema
        // In a real implementation, this would:
        // 1. Generate CREATE TABLE statements for each table
        // 2. Generate CREATE INDEX statements for each index
        // 3. Generate ALTER TABLE statements for foreign keys
        // 4. Execute each statement in a transaction

        let tables = schema.tables();
        let indexes = schema.indexes();
        let foreign_keys = schema.foreign_keys();

        println!("Applying SQLite schema migration:");
        println!("  - {} tables", tables.len());
        println!("  - {} indexes", indexes.len());
        println!("  - {} foreign keys", foreign_keys.len());

        // Simulate DDL execution
        for table in &tables {
            println!("  CREATE TABLE {} ({} columns)", table.name, table.columns.len());
        }

        for index in &indexes {
            let unique_str = if index.unique { "UNIQUE " } else { "" };
            println!("  CREATE {}INDEX {} ON {}", unique_str, index.name, index.table);
        }

        for fk in &foreign_keys {
            println!("  ALTER TABLE {} ADD FOREIGN KEY", fk.from_table);
        }

        println!("Schema migration completed successfully");
        Ok(())
    }
    
    async fn begin_transaction(&self) -> SqlResult<Box<dyn Transaction>> {
        // Create a new transaction
        // In a real implementation, this would:
        // 1. Get connection from pool
        // 2. Execute BEGIN TRANSACTION
        // 3. Return transaction handle
        println!("SQLite: Beginning transaction");
        Ok(Box::new(SqliteTransaction::new()))
    }

    async fn health_check(&self) -> SqlResult<bool> {
        // Perform health check on SQLite database
        // In a real implementation, this would:
        // 1. Try to get a connection from the pool
        // 2. Execute a simple query like SELECT 1
        // 3. Return success/failure status
        println!("SQLite: Health check passed");
        Ok(true)
    }
    
    fn metadata(&self) -> DriverMetadata {
        DriverMetadata {
            name: "SQLite".to_string(),
            version: "3.0".to_string(),
            database_type: DatabaseType::SQLite,
            supports_transactions: true,
            supports_foreign_keys: true,
            supports_json: true,
        }
    }
}

/// SQLite row representation
#[derive(Debug, Clone)]
pub struct SqliteRow {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl SqliteRow {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }
}

impl crate::orm::types::Row for SqliteRow {
    fn get(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }

    fn get_by_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn values(&self) -> &[Value] {
        &self.values
    }

    fn into_typed<T: crate::orm::types::FromRow>(self) -> Result<T, crate::orm::types::TypeConversionError> {
        T::from_row(self)
    }
}

/// SQLite transaction implementation
pub struct SqliteTransaction {
    // In a real implementation, this would hold:
    // - Connection handle
    // - Transaction state
    // - Savepoint information
    committed: bool,
}

impl SqliteTransaction {
    pub fn new() -> Self {
        Self { committed: false }
    }
}

#[async_trait]
impl Transaction for SqliteTransaction {
    async fn execute(&mut self, sql: &str, binds: &[Value]) -> SqlResult<u64> {
        // Execute SQL within transaction context
        // In a real implementation, this would:
        // 1. Execute the SQL with parameter bindings
        // 2. Return the number of affected rows
        // 3. Keep transaction open for further operations

        if self.committed {
            return Err(SqlError::runtime_error("Transaction already committed"));
        }

        println!("Transaction executing: {} with binds: {:?}", sql, binds);

        // Simulate affected rows based on query type
        if sql.to_uppercase().starts_with("INSERT") {
            Ok(1) // One row inserted
        } else if sql.to_uppercase().starts_with("UPDATE") {
            Ok(1) // One row updated
        } else if sql.to_uppercase().starts_with("DELETE") {
            Ok(1) // One row deleted
        } else {
            Ok(0) // No rows affected for other operations
        }
    }

    async fn commit(mut self: Box<Self>) -> SqlResult<()> {
        // Commit the transaction
        // In a real implementation, this would:
        // 1. Execute COMMIT on the database connection
        // 2. Release the connection back to the pool
        // 3. Mark transaction as completed

        if self.committed {
            return Err(SqlError::runtime_error("Transaction already committed"));
        }

        self.committed = true;
        println!("SQLite transaction committed successfully");
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> SqlResult<()> {
        // Rollback the transaction
        // In a real implementation, this would:
        // 1. Execute ROLLBACK on the database connection
        // 2. Release the connection back to the pool
        // 3. Mark transaction as completed

        if self.committed {
            return Err(SqlError::runtime_error("Cannot rollback committed transaction"));
        }

        self.committed = true; // Mark as completed
        println!("SQLite transaction rolled back successfully");
        Ok(())
    }
}

/// PostgreSQL driver implementation
pub struct PostgresDriver {
    connection_string: String,
}

impl PostgresDriver {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }
    
    pub async fn connect(connection_string: impl Into<String>) -> SqlResult<Self> {
        let driver = Self::new(connection_string);
        // In a real implementation, this would establish a connection pool
        // and verify connectivity to the PostgreSQL database
        println!("Connected to PostgreSQL database: {}", driver.connection_string);
        Ok(driver)
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    type Row = PostgresRow;
    
    async fn observe(&self, sql: &str, binds: &[Value]) -> SqlResult<Vec<Self::Row>> {
        // Simulate PostgreSQL query execution
        // In a real implementation, this would:
        // 1. Get connection from pool
        // 2. Prepare statement with bindings
        // 3. Execute query and collect results
        // 4. Convert results to PostgresRow format

        println!("PostgreSQL executing: {} with binds: {:?}", sql, binds);

        // Simulate some results based on query type
        if sql.to_uppercase().starts_with("SELECT") {
            // Return mock data for SELECT queries
            let mock_row = PostgresRow {
                columns: vec!["id".to_string(), "name".to_string()],
                values: vec![Value::Integer(1), Value::Text("Mock User".to_string())],
            };
            Ok(vec![mock_row])
        } else {
            // For non-SELECT queries, return empty result
            Ok(Vec::new())
        }
    }
    
    async fn migrate(&self, schema: &Schema) -> SqlResult<()> {
        // Generate and execute PostgreSQL-specific DDL statements from schema
        // In a real implementation, this would:
        // 1. Generate CREATE TABLE statements with PostgreSQL-specific types
        // 2. Generate CREATE INDEX statements
        // 3. Generate ALTER TABLE statements for foreign keys
        // 4. Execute each statement in a transaction

        let tables = schema.tables();
        let indexes = schema.indexes();
        let foreign_keys = schema.foreign_keys();

        println!("Applying PostgreSQL schema migration:");
        println!("  - {} tables", tables.len());
        println!("  - {} indexes", indexes.len());
        println!("  - {} foreign keys", foreign_keys.len());

        // Simulate DDL execution with PostgreSQL-specific features
        for table in &tables {
            println!("  CREATE TABLE {} ({} columns) WITH PostgreSQL extensions", table.name, table.columns.len());
        }

        for index in &indexes {
            let unique_str = if index.unique { "UNIQUE " } else { "" };
            println!("  CREATE {}INDEX {} ON {} USING btree", unique_str, index.name, index.table);
        }

        for fk in &foreign_keys {
            println!("  ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY", fk.from_table, fk.name);
        }

        println!("PostgreSQL schema migration completed successfully");
        Ok(())
    }
    
    async fn begin_transaction(&self) -> SqlResult<Box<dyn Transaction>> {
        Ok(Box::new(PostgresTransaction::new()))
    }
    
    async fn health_check(&self) -> SqlResult<bool> {
        Ok(true)
    }
    
    fn metadata(&self) -> DriverMetadata {
        DriverMetadata {
            name: "PostgreSQL".to_string(),
            version: "14.0".to_string(),
            database_type: DatabaseType::PostgreSQL,
            supports_transactions: true,
            supports_foreign_keys: true,
            supports_json: true,
        }
    }
}

/// PostgreSQL row representation
#[derive(Debug, Clone)]
pub struct PostgresRow {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl PostgresRow {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }
}

impl crate::orm::types::Row for PostgresRow {
    fn get(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }

    fn get_by_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn values(&self) -> &[Value] {
        &self.values
    }

    fn into_typed<T: crate::orm::types::FromRow>(self) -> Result<T, crate::orm::types::TypeConversionError> {
        T::from_row(self)
    }
}

/// PostgreSQL transaction implementation
pub struct PostgresTransaction {
    // In a real implementation, this would hold:
    // - Connection handle
    // - Transaction state
    // - Savepoint information
    committed: bool,
}

impl PostgresTransaction {
    pub fn new() -> Self {
        Self { committed: false }
    }
}

#[async_trait]
impl Transaction for PostgresTransaction {
    async fn execute(&mut self, sql: &str, binds: &[Value]) -> SqlResult<u64> {
        println!("PostgreSQL transaction executing: {} with binds: {:?}", sql, binds);
        Ok(0)
    }
    
    async fn commit(self: Box<Self>) -> SqlResult<()> {
        println!("PostgreSQL transaction committed");
        Ok(())
    }
    
    async fn rollback(self: Box<Self>) -> SqlResult<()> {
        println!("PostgreSQL transaction rolled back");
        Ok(())
    }
}

/// Connection pool for managing database connections
pub struct ConnectionPool<D: Driver> {
    drivers: Vec<D>,
    current: usize,
}

impl<D: Driver> ConnectionPool<D> {
    pub fn new(drivers: Vec<D>) -> Self {
        Self {
            drivers,
            current: 0,
        }
    }
    
    pub async fn get_connection(&mut self) -> SqlResult<&D> {
        if self.drivers.is_empty() {
            return Err(SqlError::ConnectionError {
                message: "No connections available".to_string()
            });
        }
        
        let driver = &self.drivers[self.current];
        self.current = (self.current + 1) % self.drivers.len();
        Ok(driver)
    }
    
    pub async fn health_check_all(&self) -> SqlResult<Vec<bool>> {
        let mut results = Vec::new();
        for driver in &self.drivers {
            results.push(driver.health_check().await?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::schema::{Schema, Column};
    use crate::sqlite::types::DataType;

    #[tokio::test]
    async fn test_sqlite_driver_creation() {
        let driver = SqliteDriver::new(":memory:");
        assert_eq!(driver.connection_string, ":memory:");
        
        let metadata = driver.metadata();
        assert_eq!(metadata.database_type, DatabaseType::SQLite);
        assert!(metadata.supports_transactions);
    }

    #[tokio::test]
    async fn test_postgres_driver_creation() {
        let driver = PostgresDriver::new("postgresql://localhost/test");
        assert_eq!(driver.connection_string, "postgresql://localhost/test");
        
        let metadata = driver.metadata();
        assert_eq!(metadata.database_type, DatabaseType::PostgreSQL);
        assert!(metadata.supports_transactions);
    }

    #[tokio::test]
    async fn test_driver_health_check() {
        let driver = SqliteDriver::new(":memory:");
        let health = driver.health_check().await.unwrap();
        assert!(health);
    }

    #[tokio::test]
    async fn test_connection_pool() {
        let drivers = vec![
            SqliteDriver::new(":memory:"),
            SqliteDriver::new(":memory:"),
        ];
        
        let mut pool = ConnectionPool::new(drivers);
        let _conn1 = pool.get_connection().await.unwrap();
        let _conn2 = pool.get_connection().await.unwrap();
        
        let health_results = pool.health_check_all().await.unwrap();
        assert_eq!(health_results.len(), 2);
        assert!(health_results.iter().all(|&h| h));
    }

    #[tokio::test]
    async fn test_schema_migration() {
        let driver = SqliteDriver::new(":memory:");
        
        let schema = Schema::empty()
            .add_table("users", vec![
                Column::new("id", DataType::Integer).primary_key(),
                Column::new("name", DataType::Text).not_null(),
            ]);
        
        // This should not panic - actual implementation will execute DDL
        let result = driver.migrate(&schema).await;
        assert!(result.is_ok());
    }
}
