//! Rust Crate Integration for TLISP
//! 
//! Provides seamless integration with Rust crates, allowing TLISP programs
//! to import and use Rust libraries as native extensions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::fs;
use serde::{Deserialize, Serialize};
use crate::error::{TlispError, TlispResult};
use crate::tlisp::{Value, Type};
use crate::tlisp::rust_integration::{RustFunction, FunctionSignature};
use std::sync::Arc;

/// Rust crate metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RustCrateMetadata {
    /// Crate name
    pub name: String,
    /// Crate version
    pub version: String,
    /// Crate description
    pub description: Option<String>,
    /// Crate authors
    pub authors: Vec<String>,
    /// Crate license
    pub license: Option<String>,
    /// Crate repository
    pub repository: Option<String>,
    /// Crate dependencies
    pub dependencies: HashMap<String, String>,
    /// Build dependencies
    pub build_dependencies: HashMap<String, String>,
    /// Features
    pub features: HashMap<String, Vec<String>>,
    /// Target directory
    pub target_dir: Option<PathBuf>,
    /// Library type (cdylib, staticlib, etc.)
    pub lib_type: LibraryType,
    /// Exported functions
    pub exported_functions: Vec<ExportedFunction>,
    /// Exported types
    pub exported_types: Vec<ExportedType>,
}

/// Library type for Rust crates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LibraryType {
    /// C dynamic library
    CDylib,
    /// Static library
    StaticLib,
    /// Rust library
    RustLib,
    /// Procedural macro
    ProcMacro,
}

/// Exported function metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFunction {
    /// Function name
    pub name: String,
    /// Function signature
    pub signature: String,
    /// Parameter types
    pub param_types: Vec<String>,
    /// Return type
    pub return_type: String,
    /// Documentation
    pub doc: Option<String>,
    /// Whether function is unsafe
    pub is_unsafe: bool,
    /// C ABI name (for FFI)
    pub c_name: Option<String>,
}

/// Exported type metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedType {
    /// Type name
    pub name: String,
    /// Type kind (struct, enum, trait, etc.)
    pub kind: TypeKind,
    /// Type fields (for structs)
    pub fields: Vec<TypeField>,
    /// Type variants (for enums)
    pub variants: Vec<TypeVariant>,
    /// Documentation
    pub doc: Option<String>,
}

/// Type kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeKind {
    Struct,
    Enum,
    Trait,
    Union,
    Alias,
}

/// Type field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeField {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: String,
    /// Field visibility
    pub visibility: Visibility,
    /// Documentation
    pub doc: Option<String>,
}

/// Type variant (for enums)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeVariant {
    /// Variant name
    pub name: String,
    /// Variant fields
    pub fields: Vec<TypeField>,
    /// Documentation
    pub doc: Option<String>,
}

/// Visibility level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    Crate,
    Module(String),
}

/// Rust crate integration manager
pub struct RustCrateIntegration {
    /// Loaded crates
    crates: HashMap<String, LoadedCrate>,
    /// Crate cache directory
    cache_dir: PathBuf,
    /// Build cache
    build_cache: HashMap<String, BuildArtifact>,
    /// FFI library loader
    ffi_loader: FfiLoader,
}

/// Loaded crate information
#[derive(Clone)]
pub struct LoadedCrate {
    /// Crate metadata
    pub metadata: RustCrateMetadata,
    /// Crate path
    pub path: PathBuf,
    /// Compiled library path
    pub library_path: Option<PathBuf>,
    /// Loaded functions
    pub functions: HashMap<String, Arc<dyn RustFunction>>,
    /// Load time
    pub loaded_at: std::time::SystemTime,
}

impl std::fmt::Debug for LoadedCrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedCrate")
            .field("metadata", &self.metadata)
            .field("path", &self.path)
            .field("library_path", &self.library_path)
            .field("functions", &format!("{} functions", self.functions.len()))
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Build artifact
#[derive(Debug, Clone)]
pub struct BuildArtifact {
    /// Source path
    pub source_path: PathBuf,
    /// Output path
    pub output_path: PathBuf,
    /// Build time
    pub build_time: std::time::SystemTime,
    /// Build hash
    pub build_hash: String,
}

/// FFI library loader
pub struct FfiLoader {
    /// Loaded libraries
    libraries: HashMap<String, libloading::Library>,
}

/// Crate build options
#[derive(Debug, Clone)]
pub struct CrateBuildOptions {
    /// Target triple
    pub target: Option<String>,
    /// Build profile (debug/release)
    pub profile: BuildProfile,
    /// Features to enable
    pub features: Vec<String>,
    /// Whether to build with all features
    pub all_features: bool,
    /// Whether to build without default features
    pub no_default_features: bool,
    /// Additional cargo flags
    pub cargo_flags: Vec<String>,
}

/// Build profile
#[derive(Debug, Clone)]
pub enum BuildProfile {
    Debug,
    Release,
    Custom(String),
}

impl RustCrateMetadata {
    /// Load crate metadata from Cargo.toml
    pub fn from_cargo_toml<P: AsRef<Path>>(path: P) -> TlispResult<Self> {
        let cargo_toml_path = path.as_ref().join("Cargo.toml");
        let content = fs::read_to_string(&cargo_toml_path)
            .map_err(|e| TlispError::Runtime(format!("Failed to read Cargo.toml: {}", e)))?;

        let cargo_toml: toml::Value = toml::from_str(&content)
            .map_err(|e| TlispError::Runtime(format!("Failed to parse Cargo.toml: {}", e)))?;

        let package = cargo_toml.get("package")
            .ok_or_else(|| TlispError::Runtime("No [package] section in Cargo.toml".to_string()))?;

        let name = package.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TlispError::Runtime("No package name in Cargo.toml".to_string()))?
            .to_string();

        let version = package.get("version")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TlispError::Runtime("No package version in Cargo.toml".to_string()))?
            .to_string();

        let description = package.get("description")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let authors = package.get("authors")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect())
            .unwrap_or_default();

        let license = package.get("license")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let repository = package.get("repository")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        // Parse dependencies
        let dependencies = cargo_toml.get("dependencies")
            .and_then(|v| v.as_table())
            .map(|table| {
                table.iter().map(|(k, v)| {
                    let version = match v {
                        toml::Value::String(s) => s.clone(),
                        toml::Value::Table(t) => t.get("version")
                            .and_then(|v| v.as_str())
                            .unwrap_or("*")
                            .to_string(),
                        _ => "*".to_string(),
                    };
                    (k.clone(), version)
                }).collect()
            })
            .unwrap_or_default();

        // Parse build dependencies
        let build_dependencies = cargo_toml.get("build-dependencies")
            .and_then(|v| v.as_table())
            .map(|table| {
                table.iter().map(|(k, v)| {
                    let version = match v {
                        toml::Value::String(s) => s.clone(),
                        toml::Value::Table(t) => t.get("version")
                            .and_then(|v| v.as_str())
                            .unwrap_or("*")
                            .to_string(),
                        _ => "*".to_string(),
                    };
                    (k.clone(), version)
                }).collect()
            })
            .unwrap_or_default();

        // Parse features
        let features = cargo_toml.get("features")
            .and_then(|v| v.as_table())
            .map(|table| {
                table.iter().map(|(k, v)| {
                    let deps = v.as_array()
                        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect())
                        .unwrap_or_default();
                    (k.clone(), deps)
                }).collect()
            })
            .unwrap_or_default();

        // Determine library type
        let lib_type = if cargo_toml.get("lib").is_some() {
            let lib_section = cargo_toml.get("lib").unwrap();
            let crate_type = lib_section.get("crate-type")
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|v| v.as_str())
                .unwrap_or("rlib");

            match crate_type {
                "cdylib" => LibraryType::CDylib,
                "staticlib" => LibraryType::StaticLib,
                "proc-macro" => LibraryType::ProcMacro,
                _ => LibraryType::RustLib,
            }
        } else {
            LibraryType::RustLib
        };

        Ok(RustCrateMetadata {
            name,
            version,
            description,
            authors,
            license,
            repository,
            dependencies,
            build_dependencies,
            features,
            target_dir: None,
            lib_type,
            exported_functions: Vec::new(),
            exported_types: Vec::new(),
        })
    }

    /// Extract exported functions and types from source code
    pub fn extract_exports<P: AsRef<Path>>(&mut self, _source_path: P) -> TlispResult<()> {
        // TODO: Implement actual Rust source code parsing
        // For now, this is a placeholder that would use syn or similar
        // to parse Rust source and extract public functions and types
        
        // This would involve:
        // 1. Parsing Rust source files with syn
        // 2. Finding public functions with #[no_mangle] or #[export_name]
        // 3. Extracting function signatures and converting to TLISP types
        // 4. Finding public structs, enums, and other types
        // 5. Building the exported_functions and exported_types lists

        Ok(())
    }
}

impl RustCrateIntegration {
    /// Create new Rust crate integration
    pub fn new(cache_dir: PathBuf) -> Self {
        RustCrateIntegration {
            crates: HashMap::new(),
            cache_dir,
            build_cache: HashMap::new(),
            ffi_loader: FfiLoader::new(),
        }
    }

    /// Load a Rust crate from path
    pub fn load_crate<P: AsRef<Path>>(&mut self, crate_path: P) -> TlispResult<String> {
        let path = crate_path.as_ref().to_path_buf();

        // Load crate metadata
        let mut metadata = RustCrateMetadata::from_cargo_toml(&path)?;

        // Extract exports from source
        metadata.extract_exports(&path)?;

        // Build the crate if needed
        let build_options = CrateBuildOptions::default();
        let library_path = self.build_crate(&path, &build_options)?;

        // Load the compiled library
        let functions = self.load_library_functions(&library_path, &metadata)?;

        // Create loaded crate
        let loaded_crate = LoadedCrate {
            metadata: metadata.clone(),
            path,
            library_path: Some(library_path),
            functions,
            loaded_at: std::time::SystemTime::now(),
        };

        let crate_name = metadata.name.clone();
        self.crates.insert(crate_name.clone(), loaded_crate);

        Ok(crate_name)
    }

    /// Load a crate from crates.io
    pub fn load_crate_from_registry(&mut self, name: &str, version: Option<&str>) -> TlispResult<String> {
        // Download crate from crates.io
        let crate_path = self.download_crate(name, version)?;

        // Load the downloaded crate
        self.load_crate(crate_path)
    }

    /// Build a Rust crate
    fn build_crate(&mut self, crate_path: &Path, options: &CrateBuildOptions) -> TlispResult<PathBuf> {
        // Check build cache
        let cache_key = format!("{:?}:{:?}", crate_path, options);
        if let Some(artifact) = self.build_cache.get(&cache_key) {
            if artifact.output_path.exists() {
                return Ok(artifact.output_path.clone());
            }
        }

        // Prepare cargo command
        let mut cmd = Command::new("cargo");
        cmd.current_dir(crate_path);
        cmd.arg("build");

        // Add profile
        match &options.profile {
            BuildProfile::Release => { cmd.arg("--release"); }
            BuildProfile::Debug => { /* default */ }
            BuildProfile::Custom(profile) => {
                cmd.arg("--profile").arg(profile);
            }
        }

        // Add target
        if let Some(target) = &options.target {
            cmd.arg("--target").arg(target);
        }

        // Add features
        if options.all_features {
            cmd.arg("--all-features");
        } else if options.no_default_features {
            cmd.arg("--no-default-features");
        }

        if !options.features.is_empty() {
            cmd.arg("--features").arg(options.features.join(","));
        }

        // Add additional flags
        for flag in &options.cargo_flags {
            cmd.arg(flag);
        }

        // Execute build
        let output = cmd.output()
            .map_err(|e| TlispError::Runtime(format!("Failed to execute cargo build: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TlispError::Runtime(format!("Cargo build failed: {}", stderr)));
        }

        // Find the built library
        let target_dir = crate_path.join("target");
        let profile_dir = match &options.profile {
            BuildProfile::Release => target_dir.join("release"),
            BuildProfile::Debug => target_dir.join("debug"),
            BuildProfile::Custom(profile) => target_dir.join(profile),
        };

        // Look for library files
        let lib_extensions = if cfg!(windows) {
            vec!["dll", "lib"]
        } else if cfg!(target_os = "macos") {
            vec!["dylib", "a"]
        } else {
            vec!["so", "a"]
        };

        for entry in fs::read_dir(&profile_dir)
            .map_err(|e| TlispError::Runtime(format!("Failed to read target directory: {}", e)))? {
            let entry = entry.map_err(|e| TlispError::Runtime(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();

            if let Some(extension) = path.extension() {
                if lib_extensions.contains(&extension.to_string_lossy().as_ref()) {
                    // Cache the build artifact
                    let artifact = BuildArtifact {
                        source_path: crate_path.to_path_buf(),
                        output_path: path.clone(),
                        build_time: std::time::SystemTime::now(),
                        build_hash: "TODO".to_string(), // TODO: Implement proper hashing
                    };
                    self.build_cache.insert(cache_key, artifact);

                    return Ok(path);
                }
            }
        }

        Err(TlispError::Runtime("No library file found after build".to_string()))
    }

    /// Download crate from crates.io
    fn download_crate(&self, name: &str, version: Option<&str>) -> TlispResult<PathBuf> {
        let version_str = version.unwrap_or("latest");
        let crate_dir = self.cache_dir.join("crates").join(format!("{}-{}", name, version_str));

        // Check if already downloaded
        if crate_dir.exists() {
            return Ok(crate_dir);
        }

        // Create directory
        fs::create_dir_all(&crate_dir)
            .map_err(|e| TlispError::Runtime(format!("Failed to create crate directory: {}", e)))?;

        // TODO: Implement actual download from crates.io
        // This would involve:
        // 1. Querying crates.io API for crate information
        // 2. Downloading the crate tarball
        // 3. Extracting the tarball to the cache directory

        // For now, create a placeholder Cargo.toml
        let cargo_toml = format!(
            r#"[package]
name = "{}"
version = "{}"
edition = "2021"

[lib]
crate-type = ["cdylib"]
"#,
            name, version_str
        );

        fs::write(crate_dir.join("Cargo.toml"), cargo_toml)
            .map_err(|e| TlispError::Runtime(format!("Failed to write Cargo.toml: {}", e)))?;

        // Create a basic lib.rs
        let lib_rs = r#"
#[no_mangle]
pub extern "C" fn hello_from_rust() -> i32 {
    42
}
"#;

        fs::create_dir_all(crate_dir.join("src"))
            .map_err(|e| TlispError::Runtime(format!("Failed to create src directory: {}", e)))?;

        fs::write(crate_dir.join("src").join("lib.rs"), lib_rs)
            .map_err(|e| TlispError::Runtime(format!("Failed to write lib.rs: {}", e)))?;

        Ok(crate_dir)
    }

    /// Load functions from compiled library
    fn load_library_functions(
        &mut self,
        library_path: &Path,
        metadata: &RustCrateMetadata,
    ) -> TlispResult<HashMap<String, Arc<dyn RustFunction>>> {
        let mut functions = HashMap::new();

        // Load the library using FFI
        self.ffi_loader.load_library(library_path)?;

        // Create function wrappers for exported functions
        for exported_func in &metadata.exported_functions {
            let function = self.create_function_wrapper(library_path, exported_func)?;
            functions.insert(exported_func.name.clone(), function);
        }

        Ok(functions)
    }

    /// Create a function wrapper for an exported function
    fn create_function_wrapper(
        &self,
        _library_path: &Path,
        exported_func: &ExportedFunction,
    ) -> TlispResult<Arc<dyn RustFunction>> {
        // TODO: Implement actual FFI function wrapper creation
        // This would involve:
        // 1. Loading the function symbol from the library
        // 2. Creating a wrapper that converts TLISP values to C types
        // 3. Calling the native function
        // 4. Converting the result back to TLISP values

        // For now, create a placeholder function
        let name = exported_func.name.clone();
        let signature = FunctionSignature::new(
            name.clone(),
            vec![Type::Int], // TODO: Parse actual parameter types
            Type::Int,       // TODO: Parse actual return type
        );

        Ok(Arc::new(PlaceholderRustFunction { name, signature }))
    }

    /// Get loaded crate
    pub fn get_crate(&self, name: &str) -> Option<&LoadedCrate> {
        self.crates.get(name)
    }

    /// List loaded crates
    pub fn list_crates(&self) -> Vec<&str> {
        self.crates.keys().map(|s| s.as_str()).collect()
    }

    /// Unload crate
    pub fn unload_crate(&mut self, name: &str) -> TlispResult<()> {
        if let Some(_crate) = self.crates.remove(name) {
            // TODO: Unload the library from FFI loader
            Ok(())
        } else {
            Err(TlispError::Runtime(format!("Crate {} not loaded", name)))
        }
    }
}

impl FfiLoader {
    /// Create new FFI loader
    pub fn new() -> Self {
        FfiLoader {
            libraries: HashMap::new(),
        }
    }

    /// Load a library
    pub fn load_library<P: AsRef<Path>>(&mut self, path: P) -> TlispResult<()> {
        let _path_str = path.as_ref().to_string_lossy().to_string();

        // TODO: Implement actual library loading with libloading
        // For now, just track that we "loaded" it
        // let library = unsafe { libloading::Library::new(path) }
        //     .map_err(|e| TlispError::Runtime(format!("Failed to load library: {}", e)))?;
        // self.libraries.insert(path_str, library);

        Ok(())
    }

    /// Get function symbol from library
    pub fn get_symbol<T>(&self, _library_path: &str, _symbol_name: &str) -> TlispResult<libloading::Symbol<T>> {
        // TODO: Implement actual symbol loading
        Err(TlispError::Runtime("Symbol loading not implemented".to_string()))
    }
}

impl CrateBuildOptions {
    /// Create default build options
    pub fn default() -> Self {
        CrateBuildOptions {
            target: None,
            profile: BuildProfile::Release,
            features: Vec::new(),
            all_features: false,
            no_default_features: false,
            cargo_flags: Vec::new(),
        }
    }

    /// Set target triple
    pub fn with_target(mut self, target: String) -> Self {
        self.target = Some(target);
        self
    }

    /// Set build profile
    pub fn with_profile(mut self, profile: BuildProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Add feature
    pub fn with_feature(mut self, feature: String) -> Self {
        self.features.push(feature);
        self
    }

    /// Enable all features
    pub fn with_all_features(mut self) -> Self {
        self.all_features = true;
        self
    }

    /// Disable default features
    pub fn without_default_features(mut self) -> Self {
        self.no_default_features = true;
        self
    }

    /// Add cargo flag
    pub fn with_cargo_flag(mut self, flag: String) -> Self {
        self.cargo_flags.push(flag);
        self
    }
}

/// Placeholder Rust function implementation
struct PlaceholderRustFunction {
    name: String,
    signature: FunctionSignature,
}

impl RustFunction for PlaceholderRustFunction {
    fn call(&self, args: &[Value]) -> TlispResult<Value> {
        // Placeholder implementation
        match self.name.as_str() {
            "hello_from_rust" => Ok(Value::Int(42)),
            _ => {
                // Echo the first argument or return unit
                if !args.is_empty() {
                    Ok(args[0].clone())
                } else {
                    Ok(Value::Unit)
                }
            }
        }
    }

    fn signature(&self) -> FunctionSignature {
        self.signature.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Utility functions for Rust crate integration
pub struct RustCrateUtils;

impl RustCrateUtils {
    /// Convert Rust type string to TLISP type
    pub fn rust_type_to_tlisp(rust_type: &str) -> Type {
        match rust_type {
            "i8" | "i16" | "i32" | "i64" | "isize" => Type::Int,
            "u8" | "u16" | "u32" | "u64" | "usize" => Type::Int,
            "f32" | "f64" => Type::Float,
            "bool" => Type::Bool,
            "String" | "&str" => Type::String,
            "()" => Type::Unit,
            _ => {
                // Handle complex types
                if rust_type.starts_with("Vec<") {
                    // Extract inner type
                    let inner = &rust_type[4..rust_type.len()-1];
                    let inner_type = Self::rust_type_to_tlisp(inner);
                    Type::List(Box::new(inner_type))
                } else if rust_type.starts_with("Option<") {
                    // Extract inner type
                    let inner = &rust_type[7..rust_type.len()-1];
                    let inner_type = Self::rust_type_to_tlisp(inner);
                    // TODO: Implement proper Option type
                    inner_type
                } else {
                    // Unknown type, treat as generic
                    Type::TypeVar(rust_type.to_string())
                }
            }
        }
    }

    /// Convert TLISP type to Rust type string
    pub fn tlisp_type_to_rust(tlisp_type: &Type) -> String {
        match tlisp_type {
            Type::Int => "i64".to_string(),
            Type::Float => "f64".to_string(),
            Type::Bool => "bool".to_string(),
            Type::String => "String".to_string(),
            Type::Unit => "()".to_string(),
            Type::List(inner) => format!("Vec<{}>", Self::tlisp_type_to_rust(inner)),
            Type::TypeVar(name) => name.clone(),
            _ => "()".to_string(), // Default to unit for unknown types
        }
    }

    /// Generate FFI wrapper code for a function
    pub fn generate_ffi_wrapper(func: &ExportedFunction) -> String {
        let param_conversions: Vec<String> = func.param_types.iter().enumerate()
            .map(|(i, param_type)| {
                format!("    let arg{} = convert_from_tlisp::<{}>(&args[{}])?;", i, param_type, i)
            })
            .collect();

        let call_args: Vec<String> = (0..func.param_types.len())
            .map(|i| format!("arg{}", i))
            .collect();

        format!(
            r#"
pub fn {}_wrapper(args: &[Value]) -> TlispResult<Value> {{
{}
    let result = unsafe {{ {}({}) }};
    convert_to_tlisp(result)
}}
"#,
            func.name,
            param_conversions.join("\n"),
            func.name,
            call_args.join(", ")
        )
    }
}
