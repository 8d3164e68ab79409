//! Cross-Language Module Bridge for TLISP
//! 
//! Provides seamless integration between TLISP and other languages,
//! with automatic type conversion and function call bridging.

use std::collections::HashMap;
use std::sync::Arc;
use std::any::Any;

use crate::error::{TlispError, TlispResult};
use crate::tlisp::{Value, Type, ModuleLanguage};
use crate::tlisp::rust_integration::{RustFunction, FunctionSignature};

/// Cross-language bridge for seamless function calls
pub struct CrossLanguageBridge {
    /// Registered language bridges
    bridges: HashMap<ModuleLanguage, Box<dyn LanguageBridge>>,
    /// Type converters
    type_converters: TypeConverterRegistry,
    /// Function call cache
    call_cache: FunctionCallCache,
    /// Bridge statistics
    stats: BridgeStats,
}

/// Language-specific bridge trait
pub trait LanguageBridge: Send + Sync {
    /// Get supported language
    fn language(&self) -> ModuleLanguage;
    
    /// Call function in the target language
    fn call_function(&self, name: &str, args: &[Value]) -> TlispResult<Value>;
    
    /// Get function signature
    fn get_function_signature(&self, name: &str) -> Option<FunctionSignature>;
    
    /// List available functions
    fn list_functions(&self) -> Vec<String>;
    
    /// Check if function exists
    fn has_function(&self, name: &str) -> bool;
    
    /// Convert TLISP value to target language value
    fn convert_from_tlisp(&self, value: &Value, target_type: &str) -> TlispResult<Box<dyn Any + '_>>;

    /// Convert target language value to TLISP value
    fn convert_to_tlisp(&self, value: Box<dyn Any>, source_type: &str) -> TlispResult<Value>;
}

/// Type converter registry for automatic type conversion
#[derive(Clone)]
pub struct TypeConverterRegistry {
    /// Converters from TLISP to other languages
    from_tlisp: HashMap<(Type, ModuleLanguage), Arc<dyn TypeConverter>>,
    /// Converters to TLISP from other languages
    to_tlisp: HashMap<(ModuleLanguage, String), Arc<dyn TypeConverter>>,
}

/// Type converter trait
pub trait TypeConverter: Send + Sync {
    /// Convert value
    fn convert(&self, value: Box<dyn Any>) -> TlispResult<Box<dyn Any>>;
    
    /// Get source type
    fn source_type(&self) -> String;
    
    /// Get target type
    fn target_type(&self) -> String;
}

/// Function call cache for performance optimization
#[derive(Debug, Clone)]
pub struct FunctionCallCache {
    /// Cached function results
    cache: HashMap<String, CachedCall>,
    /// Cache hit statistics
    hits: u64,
    /// Cache miss statistics
    misses: u64,
    /// Maximum cache size
    max_size: usize,
}

/// Cached function call
#[derive(Debug, Clone)]
pub struct CachedCall {
    /// Function arguments hash
    pub args_hash: u64,
    /// Cached result
    pub result: Value,
    /// Cache timestamp
    pub timestamp: std::time::SystemTime,
    /// Access count
    pub access_count: u64,
}

/// Bridge statistics
#[derive(Debug, Clone, Default)]
pub struct BridgeStats {
    /// Total function calls
    pub total_calls: u64,
    /// Successful calls
    pub successful_calls: u64,
    /// Failed calls
    pub failed_calls: u64,
    /// Type conversions performed
    pub type_conversions: u64,
    /// Cache hits
    pub cache_hits: u64,
    /// Cache misses
    pub cache_misses: u64,
    /// Average call duration
    pub avg_call_duration: std::time::Duration,
}

/// Rust language bridge implementation
pub struct RustBridge {
    /// Rust functions
    functions: HashMap<String, Arc<dyn RustFunction>>,
    /// Type mappings
    type_mappings: HashMap<String, Type>,
}

/// JavaScript bridge (placeholder for future implementation)
pub struct JavaScriptBridge {
    /// JavaScript runtime context
    context: Option<String>, // Placeholder
}

/// Python bridge (placeholder for future implementation)
pub struct PythonBridge {
    /// Python interpreter context
    context: Option<String>, // Placeholder
}

/// C bridge (placeholder for future implementation)
pub struct CBridge {
    /// C library handles
    libraries: HashMap<String, String>, // Placeholder
}

/// Bridge function call result
#[derive(Debug, Clone)]
pub struct BridgeCallResult {
    /// Function result
    pub result: Value,
    /// Call duration
    pub duration: std::time::Duration,
    /// Type conversions performed
    pub conversions: u32,
    /// Whether result was cached
    pub was_cached: bool,
}

impl CrossLanguageBridge {
    /// Create new cross-language bridge
    pub fn new() -> Self {
        let mut bridge = CrossLanguageBridge {
            bridges: HashMap::new(),
            type_converters: TypeConverterRegistry::new(),
            call_cache: FunctionCallCache::new(1000), // Default cache size
            stats: BridgeStats::default(),
        };
        
        // Register default bridges
        bridge.register_bridge(Box::new(RustBridge::new()));
        
        bridge
    }

    /// Register a language bridge
    pub fn register_bridge(&mut self, bridge: Box<dyn LanguageBridge>) {
        let language = bridge.language();
        self.bridges.insert(language, bridge);
    }

    /// Call function across language boundaries
    pub fn call_function(&mut self, language: ModuleLanguage, name: &str, args: &[Value]) -> TlispResult<BridgeCallResult> {
        let start_time = std::time::Instant::now();
        self.stats.total_calls += 1;

        // Check cache first
        let cache_key = self.generate_cache_key(language.clone(), name, args);
        if let Some(cached) = self.call_cache.get(&cache_key) {
            self.stats.cache_hits += 1;
            self.stats.successful_calls += 1;
            return Ok(BridgeCallResult {
                result: cached.result.clone(),
                duration: start_time.elapsed(),
                conversions: 0,
                was_cached: true,
            });
        }

        self.stats.cache_misses += 1;

        // Perform type conversions if needed
        let converted_args = match self.convert_arguments(args, language.clone(), name) {
            Ok(args) => args,
            Err(e) => {
                self.stats.failed_calls += 1;
                return Err(e);
            }
        };
        let conversion_count = converted_args.len() as u32;

        // Get language bridge and call function
        let result = {
            let bridge = match self.bridges.get(&language) {
                Some(bridge) => bridge,
                None => {
                    self.stats.failed_calls += 1;
                    return Err(TlispError::Runtime(
                        format!("No bridge registered for language: {:?}", language)
                    ));
                }
            };
            bridge.call_function(name, &converted_args)
        };

        // Process result
        match result {
            Ok(result) => {
                let duration = start_time.elapsed();
                self.stats.successful_calls += 1;
                self.stats.type_conversions += conversion_count as u64;
                
                // Update average call duration
                let total_duration = self.stats.avg_call_duration.as_nanos() as u64 * (self.stats.successful_calls - 1) + duration.as_nanos() as u64;
                self.stats.avg_call_duration = std::time::Duration::from_nanos(total_duration / self.stats.successful_calls);

                // Cache result
                self.call_cache.insert(cache_key, result.clone());

                Ok(BridgeCallResult {
                    result,
                    duration,
                    conversions: conversion_count,
                    was_cached: false,
                })
            }
            Err(e) => {
                self.stats.failed_calls += 1;
                Err(e)
            }
        }
    }

    /// Convert arguments for cross-language calls
    fn convert_arguments(&mut self, args: &[Value], language: ModuleLanguage, function_name: &str) -> TlispResult<Vec<Value>> {
        // Get function signature to determine expected types
        let bridge = self.bridges.get(&language)
            .ok_or_else(|| TlispError::Runtime(format!("Language bridge not found: {:?}", language)))?;
        let signature = bridge.get_function_signature(function_name);

        let mut converted_args = Vec::new();
        for (i, arg) in args.iter().enumerate() {
            if let Some(sig) = &signature {
                if i < sig.param_types.len() {
                    // Convert based on expected type
                    let type_str = format!("{:?}", sig.param_types[i]);
                    let converted = self.type_converters.convert_from_tlisp(arg, &type_str, language.clone())?;
                    converted_args.push(converted);
                } else {
                    // No type information, use as-is
                    converted_args.push(arg.clone());
                }
            } else {
                // No signature information, use as-is
                converted_args.push(arg.clone());
            }
        }

        Ok(converted_args)
    }

    /// Generate cache key for function call
    fn generate_cache_key(&self, language: ModuleLanguage, name: &str, args: &[Value]) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        format!("{:?}:{}", language, name).hash(&mut hasher);
        
        for arg in args {
            // Simple hash of argument values
            format!("{:?}", arg).hash(&mut hasher);
        }

        format!("{}:{:x}", name, hasher.finish())
    }

    /// Get function signature from any language
    pub fn get_function_signature(&self, language: ModuleLanguage, name: &str) -> Option<FunctionSignature> {
        self.bridges.get(&language)?.get_function_signature(name)
    }

    /// List functions from a specific language
    pub fn list_functions(&self, language: ModuleLanguage) -> Vec<String> {
        self.bridges.get(&language)
            .map(|bridge| bridge.list_functions())
            .unwrap_or_default()
    }

    /// List all available languages
    pub fn list_languages(&self) -> Vec<ModuleLanguage> {
        self.bridges.keys().cloned().collect()
    }

    /// Check if function exists in any language
    pub fn has_function(&self, language: ModuleLanguage, name: &str) -> bool {
        self.bridges.get(&language)
            .map(|bridge| bridge.has_function(name))
            .unwrap_or(false)
    }

    /// Get bridge statistics
    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    /// Clear function call cache
    pub fn clear_cache(&mut self) {
        self.call_cache.clear();
    }

    /// Set cache size
    pub fn set_cache_size(&mut self, size: usize) {
        self.call_cache.set_max_size(size);
    }

    /// Register type converter
    pub fn register_type_converter(&mut self, converter: Arc<dyn TypeConverter>, from_type: Type, to_language: ModuleLanguage) {
        self.type_converters.register_from_tlisp(from_type, to_language, converter);
    }
}

impl TypeConverterRegistry {
    /// Create new type converter registry
    pub fn new() -> Self {
        let mut registry = TypeConverterRegistry {
            from_tlisp: HashMap::new(),
            to_tlisp: HashMap::new(),
        };

        // Register default converters
        registry.register_default_converters();
        registry
    }

    /// Register converter from TLISP to other language
    pub fn register_from_tlisp(&mut self, from_type: Type, to_language: ModuleLanguage, converter: Arc<dyn TypeConverter>) {
        self.from_tlisp.insert((from_type, to_language), converter);
    }

    /// Register converter to TLISP from other language
    pub fn register_to_tlisp(&mut self, from_language: ModuleLanguage, from_type: String, converter: Arc<dyn TypeConverter>) {
        self.to_tlisp.insert((from_language, from_type), converter);
    }

    /// Convert value from TLISP to target language
    pub fn convert_from_tlisp(&self, value: &Value, target_type: &str, target_language: ModuleLanguage) -> TlispResult<Value> {
        let source_type = value.type_of();
        
        if let Some(converter) = self.from_tlisp.get(&(source_type, target_language)) {
            // Use registered converter
            let any_value = Box::new(value.clone()) as Box<dyn Any>;
            let converted = converter.convert(any_value)?;

            // Convert the result back to a TLISP Value
            // This is a simplified implementation - in practice, we'd need
            // proper type mapping between languages
            self.any_to_value(converted)
        } else {
            // No converter found, try default conversion
            self.default_convert_from_tlisp(value, target_type)
        }
    }

    /// Convert value to TLISP from source language
    pub fn convert_to_tlisp(&self, value: Box<dyn Any>, source_type: &str, source_language: ModuleLanguage) -> TlispResult<Value> {
        if let Some(converter) = self.to_tlisp.get(&(source_language, source_type.to_string())) {
            let converted = converter.convert(value)?;
            // Convert Any back to Value
            self.any_to_value(converted)
        } else {
            // Default conversion based on source type
            self.default_convert_to_tlisp(value, source_type)
        }
    }

    /// Convert Any value back to TLISP Value
    fn any_to_value(&self, any_value: Box<dyn Any>) -> TlispResult<Value> {
        // This is a simplified implementation
        // In practice, we'd need proper type introspection and conversion

        // We need to handle the fact that downcast consumes the value
        // Try each type in order, using type_id to check first
        use std::any::TypeId;

        let type_id = any_value.type_id();

        if type_id == TypeId::of::<i64>() {
            if let Ok(int_val) = any_value.downcast::<i64>() {
                return Ok(Value::Int(*int_val));
            }
        } else if type_id == TypeId::of::<f64>() {
            if let Ok(float_val) = any_value.downcast::<f64>() {
                return Ok(Value::Float(*float_val));
            }
        } else if type_id == TypeId::of::<bool>() {
            if let Ok(bool_val) = any_value.downcast::<bool>() {
                return Ok(Value::Bool(*bool_val));
            }
        } else if type_id == TypeId::of::<String>() {
            if let Ok(string_val) = any_value.downcast::<String>() {
                return Ok(Value::String(*string_val));
            }
        }

        // Fallback to Unit for unknown types
        Ok(Value::Unit)
    }

    /// Default conversion to TLISP
    fn default_convert_to_tlisp(&self, _value: Box<dyn Any>, _source_type: &str) -> TlispResult<Value> {
        // Default implementation - just return Unit
        // In practice, this would implement basic type conversions
        Ok(Value::Unit)
    }

    /// Register default type converters
    fn register_default_converters(&mut self) {
        // TODO: Implement default converters for common types
        // This would include converters for:
        // - Int <-> i32, i64, etc.
        // - Float <-> f32, f64
        // - String <-> String, &str
        // - Bool <-> bool
        // - List <-> Vec<T>
        // - etc.
    }

    /// Default conversion from TLISP
    fn default_convert_from_tlisp(&self, value: &Value, _target_type: &str) -> TlispResult<Value> {
        // Simple pass-through for now
        // In a real implementation, this would perform basic type conversions
        Ok(value.clone())
    }
}

impl FunctionCallCache {
    /// Create new function call cache
    pub fn new(max_size: usize) -> Self {
        FunctionCallCache {
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
            max_size,
        }
    }

    /// Get cached call result
    pub fn get(&mut self, key: &str) -> Option<&CachedCall> {
        if let Some(cached) = self.cache.get_mut(key) {
            cached.access_count += 1;
            self.hits += 1;
            Some(cached)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Insert call result into cache
    pub fn insert(&mut self, key: String, result: Value) {
        // Evict old entries if cache is full
        if self.cache.len() >= self.max_size {
            self.evict_lru();
        }

        let cached_call = CachedCall {
            args_hash: 0, // TODO: Implement proper argument hashing
            result,
            timestamp: std::time::SystemTime::now(),
            access_count: 1,
        };

        self.cache.insert(key, cached_call);
    }

    /// Evict least recently used entry
    fn evict_lru(&mut self) {
        if let Some((key_to_remove, _)) = self.cache.iter()
            .min_by_key(|(_, cached)| (cached.access_count, cached.timestamp))
            .map(|(k, v)| (k.clone(), v.clone())) {
            self.cache.remove(&key_to_remove);
        }
    }

    /// Clear cache
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Set maximum cache size
    pub fn set_max_size(&mut self, size: usize) {
        self.max_size = size;
        while self.cache.len() > size {
            self.evict_lru();
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> (u64, u64, usize) {
        (self.hits, self.misses, self.cache.len())
    }
}

impl RustBridge {
    /// Create new Rust bridge
    pub fn new() -> Self {
        RustBridge {
            functions: HashMap::new(),
            type_mappings: HashMap::new(),
        }
    }

    /// Register Rust function
    pub fn register_function(&mut self, name: String, function: Arc<dyn RustFunction>) {
        self.functions.insert(name, function);
    }

    /// Register type mapping
    pub fn register_type_mapping(&mut self, rust_type: String, tlisp_type: Type) {
        self.type_mappings.insert(rust_type, tlisp_type);
    }
}

impl LanguageBridge for RustBridge {
    fn language(&self) -> ModuleLanguage {
        ModuleLanguage::Rust
    }

    fn call_function(&self, name: &str, args: &[Value]) -> TlispResult<Value> {
        if let Some(function) = self.functions.get(name) {
            function.call(args)
        } else {
            Err(TlispError::Runtime(format!("Rust function '{}' not found", name)))
        }
    }

    fn get_function_signature(&self, name: &str) -> Option<FunctionSignature> {
        self.functions.get(name).map(|f| f.signature())
    }

    fn list_functions(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }

    fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn convert_from_tlisp(&self, value: &Value, target_type: &str) -> TlispResult<Box<dyn Any + '_>> {
        // Convert TLISP value to Rust value
        match (value, target_type) {
            (Value::Int(i), "i32") => Ok(Box::new(*i as i32)),
            (Value::Int(i), "i64") => Ok(Box::new(*i)),
            (Value::Int(i), "usize") => Ok(Box::new(*i as usize)),
            (Value::Float(f), "f32") => Ok(Box::new(*f as f32)),
            (Value::Float(f), "f64") => Ok(Box::new(*f)),
            (Value::Bool(b), "bool") => Ok(Box::new(*b)),
            (Value::String(s), "String") => Ok(Box::new(s.clone())),
            (Value::String(s), "&str") => Ok(Box::new(s.clone())), // Convert to String instead of &str
            (Value::List(items), "Vec<i64>") => {
                let mut vec = Vec::new();
                for item in items {
                    if let Value::Int(i) = item {
                        vec.push(*i);
                    } else {
                        return Err(TlispError::Runtime("List contains non-integer values".to_string()));
                    }
                }
                Ok(Box::new(vec))
            }
            _ => {
                // Default: pass through as TLISP Value
                Ok(Box::new(value.clone()))
            }
        }
    }

    fn convert_to_tlisp(&self, value: Box<dyn Any>, source_type: &str) -> TlispResult<Value> {
        // Convert Rust value to TLISP value
        match source_type {
            "i32" => {
                if let Some(i) = value.downcast_ref::<i32>() {
                    Ok(Value::Int(*i as i64))
                } else {
                    Err(TlispError::Runtime("Failed to downcast i32".to_string()))
                }
            }
            "i64" => {
                if let Some(i) = value.downcast_ref::<i64>() {
                    Ok(Value::Int(*i))
                } else {
                    Err(TlispError::Runtime("Failed to downcast i64".to_string()))
                }
            }
            "f32" => {
                if let Some(f) = value.downcast_ref::<f32>() {
                    Ok(Value::Float(*f as f64))
                } else {
                    Err(TlispError::Runtime("Failed to downcast f32".to_string()))
                }
            }
            "f64" => {
                if let Some(f) = value.downcast_ref::<f64>() {
                    Ok(Value::Float(*f))
                } else {
                    Err(TlispError::Runtime("Failed to downcast f64".to_string()))
                }
            }
            "bool" => {
                if let Some(b) = value.downcast_ref::<bool>() {
                    Ok(Value::Bool(*b))
                } else {
                    Err(TlispError::Runtime("Failed to downcast bool".to_string()))
                }
            }
            "String" => {
                if let Some(s) = value.downcast_ref::<String>() {
                    Ok(Value::String(s.clone()))
                } else {
                    Err(TlispError::Runtime("Failed to downcast String".to_string()))
                }
            }
            "Vec<i64>" => {
                if let Some(vec) = value.downcast_ref::<Vec<i64>>() {
                    let items: Vec<Value> = vec.iter().map(|&i| Value::Int(i)).collect();
                    Ok(Value::List(items))
                } else {
                    Err(TlispError::Runtime("Failed to downcast Vec<i64>".to_string()))
                }
            }
            _ => {
                // Try to downcast as TLISP Value
                if let Some(val) = value.downcast_ref::<Value>() {
                    Ok(val.clone())
                } else {
                    Err(TlispError::Runtime(format!("Unknown source type: {}", source_type)))
                }
            }
        }
    }
}

// Placeholder implementations for other language bridges
impl LanguageBridge for JavaScriptBridge {
    fn language(&self) -> ModuleLanguage {
        ModuleLanguage::JavaScript
    }

    fn call_function(&self, _name: &str, _args: &[Value]) -> TlispResult<Value> {
        Err(TlispError::Runtime("JavaScript bridge not implemented yet".to_string()))
    }

    fn get_function_signature(&self, _name: &str) -> Option<FunctionSignature> {
        None
    }

    fn list_functions(&self) -> Vec<String> {
        Vec::new()
    }

    fn has_function(&self, _name: &str) -> bool {
        false
    }

    fn convert_from_tlisp(&self, _value: &Value, _target_type: &str) -> TlispResult<Box<dyn Any + '_>> {
        Err(TlispError::Runtime("JavaScript bridge not implemented yet".to_string()))
    }

    fn convert_to_tlisp(&self, _value: Box<dyn Any>, _source_type: &str) -> TlispResult<Value> {
        Err(TlispError::Runtime("JavaScript bridge not implemented yet".to_string()))
    }
}

impl LanguageBridge for PythonBridge {
    fn language(&self) -> ModuleLanguage {
        ModuleLanguage::Python
    }

    fn call_function(&self, _name: &str, _args: &[Value]) -> TlispResult<Value> {
        Err(TlispError::Runtime("Python bridge not implemented yet".to_string()))
    }

    fn get_function_signature(&self, _name: &str) -> Option<FunctionSignature> {
        None
    }

    fn list_functions(&self) -> Vec<String> {
        Vec::new()
    }

    fn has_function(&self, _name: &str) -> bool {
        false
    }

    fn convert_from_tlisp(&self, _value: &Value, _target_type: &str) -> TlispResult<Box<dyn Any + '_>> {
        Err(TlispError::Runtime("Python bridge not implemented yet".to_string()))
    }

    fn convert_to_tlisp(&self, _value: Box<dyn Any>, _source_type: &str) -> TlispResult<Value> {
        Err(TlispError::Runtime("Python bridge not implemented yet".to_string()))
    }
}

impl LanguageBridge for CBridge {
    fn language(&self) -> ModuleLanguage {
        ModuleLanguage::C
    }

    fn call_function(&self, _name: &str, _args: &[Value]) -> TlispResult<Value> {
        Err(TlispError::Runtime("C bridge not implemented yet".to_string()))
    }

    fn get_function_signature(&self, _name: &str) -> Option<FunctionSignature> {
        None
    }

    fn list_functions(&self) -> Vec<String> {
        Vec::new()
    }

    fn has_function(&self, _name: &str) -> bool {
        false
    }

    fn convert_from_tlisp(&self, _value: &Value, _target_type: &str) -> TlispResult<Box<dyn Any + '_>> {
        Err(TlispError::Runtime("C bridge not implemented yet".to_string()))
    }

    fn convert_to_tlisp(&self, _value: Box<dyn Any>, _source_type: &str) -> TlispResult<Value> {
        Err(TlispError::Runtime("C bridge not implemented yet".to_string()))
    }
}

/// Utility functions for the cross-language bridge
pub struct BridgeUtils;

impl BridgeUtils {
    /// Create a simple type converter
    pub fn create_simple_converter<F>(source: String, target: String, convert_fn: F) -> Arc<dyn TypeConverter>
    where
        F: Fn(Box<dyn Any>) -> TlispResult<Box<dyn Any>> + Send + Sync + 'static,
    {
        Arc::new(SimpleTypeConverter {
            source_type: source,
            target_type: target,
            convert_fn: Box::new(convert_fn),
        })
    }

    /// Get default type mapping for a language
    pub fn get_default_type_mapping(language: ModuleLanguage) -> HashMap<Type, String> {
        let mut mapping = HashMap::new();

        match language {
            ModuleLanguage::Rust => {
                mapping.insert(Type::Int, "i64".to_string());
                mapping.insert(Type::Float, "f64".to_string());
                mapping.insert(Type::Bool, "bool".to_string());
                mapping.insert(Type::String, "String".to_string());
                mapping.insert(Type::Unit, "()".to_string());
            }
            ModuleLanguage::JavaScript => {
                mapping.insert(Type::Int, "number".to_string());
                mapping.insert(Type::Float, "number".to_string());
                mapping.insert(Type::Bool, "boolean".to_string());
                mapping.insert(Type::String, "string".to_string());
                mapping.insert(Type::Unit, "undefined".to_string());
            }
            ModuleLanguage::Python => {
                mapping.insert(Type::Int, "int".to_string());
                mapping.insert(Type::Float, "float".to_string());
                mapping.insert(Type::Bool, "bool".to_string());
                mapping.insert(Type::String, "str".to_string());
                mapping.insert(Type::Unit, "None".to_string());
            }
            ModuleLanguage::C => {
                mapping.insert(Type::Int, "long long".to_string());
                mapping.insert(Type::Float, "double".to_string());
                mapping.insert(Type::Bool, "int".to_string());
                mapping.insert(Type::String, "char*".to_string());
                mapping.insert(Type::Unit, "void".to_string());
            }
            _ => {}
        }

        mapping
    }
}

/// Simple type converter implementation
struct SimpleTypeConverter {
    source_type: String,
    target_type: String,
    convert_fn: Box<dyn Fn(Box<dyn Any>) -> TlispResult<Box<dyn Any>> + Send + Sync>,
}

impl TypeConverter for SimpleTypeConverter {
    fn convert(&self, value: Box<dyn Any>) -> TlispResult<Box<dyn Any>> {
        (self.convert_fn)(value)
    }

    fn source_type(&self) -> String {
        self.source_type.clone()
    }

    fn target_type(&self) -> String {
        self.target_type.clone()
    }
}
