pub mod advanced_sql_showcase;
