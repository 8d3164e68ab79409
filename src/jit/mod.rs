//! REAM JIT Compiler - Coalgebraic native code generation

pub mod compiler;
pub mod optimization;
pub mod runtime;

use std::collections::HashMap;
use std::sync::Arc;
use crate::bytecode::{BytecodeProgram, Value};
use crate::types::EffectGrade;
use crate::error::JitResult;

pub use compiler::ReamJIT;
pub use optimization::{HotSpotOptimizer, PerformanceMonitor};
pub use runtime::JitRuntime;

/// JIT-compiled function handle
#[derive(Debug, Clone)]
pub struct JitFunction {
    /// Function pointer
    function_ptr: *const u8,
    /// Function size in bytes
    size: usize,
    /// Effect grade
    effect_grade: EffectGrade,
    /// Compilation metadata
    metadata: JitMetadata,
}

/// JIT compilation metadata
#[derive(Debug, Clone)]
pub struct JitMetadata {
    /// Original bytecode size
    pub bytecode_size: usize,
    /// Native code size
    pub native_size: usize,
    /// Compilation time
    pub compile_time: std::time::Duration,
    /// Optimization level
    pub opt_level: u8,
    /// Hot spot information
    pub hot_spots: Vec<usize>,
}

impl JitFunction {
    /// Create a new JIT function
    pub fn new(
        function_ptr: *const u8,
        size: usize,
        effect_grade: EffectGrade,
        metadata: JitMetadata,
    ) -> Self {
        JitFunction {
            function_ptr,
            size,
            effect_grade,
            metadata,
        }
    }
    
    /// Call the JIT-compiled function
    pub fn call(&self, args: &[Value]) -> JitResult<Value> {
        // Safety: This is inherently unsafe as we're calling dynamically generated code
        unsafe {
            let func: extern "C" fn(*const Value, usize) -> Value = 
                std::mem::transmute(self.function_ptr);
            
            Ok(func(args.as_ptr(), args.len()))
        }
    }
    
    /// Call with no arguments
    pub fn call0(&self) -> JitResult<Value> {
        self.call(&[])
    }
    
    /// Call with one argument
    pub fn call1(&self, arg: Value) -> JitResult<Value> {
        self.call(&[arg])
    }
    
    /// Call with two arguments
    pub fn call2(&self, arg1: Value, arg2: Value) -> JitResult<Value> {
        self.call(&[arg1, arg2])
    }
    
    /// Get function pointer
    pub fn ptr(&self) -> *const u8 {
        self.function_ptr
    }
    
    /// Get function size
    pub fn size(&self) -> usize {
        self.size
    }
    
    /// Get effect grade
    pub fn effect_grade(&self) -> EffectGrade {
        self.effect_grade
    }
    
    /// Get metadata
    pub fn metadata(&self) -> &JitMetadata {
        &self.metadata
    }
    
    /// Check if function is valid
    pub fn is_valid(&self) -> bool {
        !self.function_ptr.is_null() && self.size > 0
    }
}

unsafe impl Send for JitFunction {}
unsafe impl Sync for JitFunction {}

/// JIT compilation context
pub struct JitContext {
    /// Compiled functions cache
    functions: HashMap<String, Arc<JitFunction>>,
    /// Performance monitor
    monitor: PerformanceMonitor,
    /// Hot spot optimizer
    optimizer: HotSpotOptimizer,
    /// JIT statistics
    stats: JitStats,
}

/// JIT compilation statistics
#[derive(Debug, Default, Clone)]
pub struct JitStats {
    /// Functions compiled
    pub functions_compiled: u64,
    /// Total compilation time
    pub total_compile_time: std::time::Duration,
    /// Cache hits
    pub cache_hits: u64,
    /// Cache misses
    pub cache_misses: u64,
    /// Hot spot optimizations
    pub hot_spot_optimizations: u64,
    /// Native code size
    pub native_code_size: usize,
}

impl JitContext {
    /// Create a new JIT context
    pub fn new() -> Self {
        JitContext {
            functions: HashMap::new(),
            monitor: PerformanceMonitor::new(),
            optimizer: HotSpotOptimizer::new(),
            stats: JitStats::default(),
        }
    }
    
    /// Compile a bytecode program to native code
    pub fn compile(&mut self, program: &BytecodeProgram) -> JitResult<Arc<JitFunction>> {
        let cache_key = self.generate_cache_key(program);
        
        // Check cache first
        if let Some(cached) = self.functions.get(&cache_key) {
            self.stats.cache_hits += 1;
            return Ok(Arc::clone(cached));
        }
        
        self.stats.cache_misses += 1;
        
        // Compile with JIT
        let start_time = std::time::Instant::now();
        let mut jit = ReamJIT::new();
        let jit_func = jit.compile_program(program)?;
        let compile_time = start_time.elapsed();
        
        // Update statistics
        self.stats.functions_compiled += 1;
        self.stats.total_compile_time += compile_time;
        self.stats.native_code_size += jit_func.size();
        
        // Cache the function
        let func_arc = Arc::new(jit_func);
        self.functions.insert(cache_key, Arc::clone(&func_arc));
        
        Ok(func_arc)
    }
    
    /// Execute a program with JIT compilation
    pub fn execute(&mut self, program: &BytecodeProgram, args: &[Value]) -> JitResult<Value> {
        let func = self.compile(program)?;
        
        // Monitor performance
        let start = std::time::Instant::now();
        let result = func.call(args)?;
        let duration = start.elapsed();
        
        self.monitor.observe_execution(program, duration);
        
        // Check for hot spots and optimize if needed
        if self.monitor.should_optimize(program) {
            self.optimize_hot_spots(program)?;
        }
        
        Ok(result)
    }
    
    /// Get JIT statistics
    pub fn stats(&self) -> &JitStats {
        &self.stats
    }
    
    /// Clear function cache
    pub fn clear_cache(&mut self) {
        self.functions.clear();
        self.stats.cache_hits = 0;
        self.stats.cache_misses = 0;
    }
    
    /// Get cache size
    pub fn cache_size(&self) -> usize {
        self.functions.len()
    }
    
    // Private helper methods
    
    fn generate_cache_key(&self, program: &BytecodeProgram) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        
        let mut hasher = DefaultHasher::new();
        
        // Hash program instructions
        for instr in &program.instructions {
            format!("{:?}", instr).hash(&mut hasher);
        }
        
        // Hash constants
        for constant in &program.constants {
            format!("{:?}", constant).hash(&mut hasher);
        }
        
        format!("jit_{:x}", hasher.finish())
    }
    
    fn optimize_hot_spots(&mut self, program: &BytecodeProgram) -> JitResult<()> {
        let hot_spots = self.monitor.get_hot_spots(program);
        
        if !hot_spots.is_empty() {
            let optimized = self.optimizer.optimize_program(program, &hot_spots)?;
            
            // Recompile with optimizations
            let cache_key = self.generate_cache_key(program);
            let mut jit = ReamJIT::new();
            jit.set_optimization_level(3); // Aggressive optimization
            let optimized_func = jit.compile_program(&optimized)?;
            
            // Update cache
            self.functions.insert(cache_key, Arc::new(optimized_func));
            self.stats.hot_spot_optimizations += 1;
        }
        
        Ok(())
    }

    /// Set optimization level
    pub fn set_optimization_level(&mut self, level: u8) {
        // Configure the optimizer with the new level
        let mut options = JitOptions::default();
        options.opt_level = level.min(3);
        self.optimizer.set_options(&options);
    }

    /// Set debug information generation
    pub fn set_debug_info(&mut self, enable: bool) {
        // Configure debug info generation
        let mut options = JitOptions::default();
        options.debug_info = enable;
        self.optimizer.set_options(&options);
    }

    /// Enable profiling
    pub fn enable_profiling(&mut self) {
        // Enable performance monitoring
        self.monitor.enable_profiling();
    }
}

impl Default for JitContext {
    fn default() -> Self {
        Self::new()
    }
}

/// JIT compilation options
#[derive(Debug, Clone)]
pub struct JitOptions {
    /// Optimization level (0-3)
    pub opt_level: u8,
    /// Enable hot spot detection
    pub enable_hot_spots: bool,
    /// Hot spot threshold
    pub hot_spot_threshold: u64,
    /// Enable function inlining
    pub enable_inlining: bool,
    /// Maximum function size for inlining
    pub inline_threshold: usize,
    /// Enable debug information
    pub debug_info: bool,
}

impl Default for JitOptions {
    fn default() -> Self {
        JitOptions {
            opt_level: 2,
            enable_hot_spots: true,
            hot_spot_threshold: 1000,
            enable_inlining: true,
            inline_threshold: 100,
            debug_info: false,
        }
    }
}

/// JIT compiler builder
pub struct JitBuilder {
    options: JitOptions,
}

impl JitBuilder {
    /// Create a new JIT builder
    pub fn new() -> Self {
        JitBuilder {
            options: JitOptions::default(),
        }
    }
    
    /// Set optimization level
    pub fn opt_level(mut self, level: u8) -> Self {
        self.options.opt_level = level.min(3);
        self
    }
    
    /// Enable/disable hot spot detection
    pub fn hot_spots(mut self, enable: bool) -> Self {
        self.options.enable_hot_spots = enable;
        self
    }
    
    /// Set hot spot threshold
    pub fn hot_spot_threshold(mut self, threshold: u64) -> Self {
        self.options.hot_spot_threshold = threshold;
        self
    }
    
    /// Enable/disable function inlining
    pub fn inlining(mut self, enable: bool) -> Self {
        self.options.enable_inlining = enable;
        self
    }
    
    /// Enable/disable debug information
    pub fn debug_info(mut self, enable: bool) -> Self {
        self.options.debug_info = enable;
        self
    }
    
    /// Build the JIT context
    pub fn build(self) -> JitContext {
        let mut context = JitContext::new();
        
        // Configure optimizer
        context.optimizer.set_options(&self.options);
        
        // Configure monitor
        context.monitor.set_hot_spot_threshold(self.options.hot_spot_threshold);
        
        context
    }
}

impl Default for JitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
