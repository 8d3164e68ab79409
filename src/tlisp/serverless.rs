//! TLisp serverless extensions
//! 
//! Provides hibernation syntax, serverless function definitions, and auto-scaling
//! directives for the TLisp language integration with REAM's serverless architecture.

use std::collections::HashMap;
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::tlisp::Value;
use crate::tlisp::environment::Environment;
use crate::error::TlispResult;
use crate::runtime::serverless::{
    ServerlessFunction, ServerlessDeployment, AutoScalingConfig, MonitoringConfig,
    WakeTrigger, HibernationPolicy
};

/// Serverless-specific TLisp forms and macros
pub struct ServerlessExtensions {
    /// Registered serverless functions
    functions: HashMap<String, ServerlessFunction>,
    /// Registered deployments
    deployments: HashMap<String, ServerlessDeployment>,
    /// Hibernation policies by actor type
    hibernation_policies: HashMap<String, HibernationPolicy>,
}

impl ServerlessExtensions {
    /// Create new serverless extensions
    pub fn new() -> Self {
        ServerlessExtensions {
            functions: HashMap::new(),
            deployments: HashMap::new(),
            hibernation_policies: HashMap::new(),
        }
    }
    
    /// Register serverless extensions with TLisp environment
    pub fn register_with_environment(&self, env: &mut Environment) -> TlispResult<()> {
        // Register hibernation forms
        self.register_hibernation_forms(env)?;

        // Register serverless function forms
        self.register_function_forms(env)?;

        // Register deployment forms
        self.register_deployment_forms(env)?;

        // Register auto-scaling forms
        self.register_scaling_forms(env)?;

        Ok(())
    }
    
    /// Register hibernation-related forms
    fn register_hibernation_forms(&self, env: &mut Environment) -> TlispResult<()> {
        // For now, we'll register simplified versions without complex macro parsing
        // In a full implementation, these would be proper TLisp macros

        // Register hibernation policy function
        env.define("define-hibernation-policy".to_string(), Value::Symbol("hibernation-policy-fn".to_string()));

        // Register hibernation functions
        env.define("hibernate-self".to_string(), Value::Symbol("hibernate-self-fn".to_string()));
        env.define("wake-actor".to_string(), Value::Symbol("wake-actor-fn".to_string()));

        Ok(())
    }
    
    /// Register serverless function forms
    fn register_function_forms(&self, env: &mut Environment) -> TlispResult<()> {
        // Register simplified serverless function definitions
        env.define("define-serverless-function".to_string(), Value::Symbol("serverless-function-fn".to_string()));
        env.define("invoke-function".to_string(), Value::Symbol("invoke-function-fn".to_string()));

        Ok(())
    }
    
    /// Register deployment forms
    fn register_deployment_forms(&self, env: &mut Environment) -> TlispResult<()> {
        // Register simplified deployment definitions
        env.define("define-serverless-deployment".to_string(), Value::Symbol("deployment-fn".to_string()));

        Ok(())
    }

    /// Register auto-scaling forms
    fn register_scaling_forms(&self, env: &mut Environment) -> TlispResult<()> {
        // Register simplified scaling definitions
        env.define("define-scaling-policy".to_string(), Value::Symbol("scaling-policy-fn".to_string()));
        env.define("scale-function".to_string(), Value::Symbol("scale-function-fn".to_string()));

        Ok(())
    }

    /// Parse hibernation policy from TLisp value
    fn parse_hibernation_policy(_value: &Value) -> TlispResult<HibernationPolicy> {
        // This is a simplified parser - in a real implementation,
        // this would parse the full hibernation policy specification
        Ok(HibernationPolicy::default())
    }

    /// Parse function configuration from TLisp value
    fn parse_function_config(_value: &Value) -> TlispResult<ServerlessFunctionConfig> {
        // This is a simplified parser
        Ok(ServerlessFunctionConfig::default())
    }

    /// Parse deployment configuration from TLisp value
    fn parse_deployment_config(_value: &Value) -> TlispResult<ServerlessDeploymentConfig> {
        // This is a simplified parser
        Ok(ServerlessDeploymentConfig::default())
    }

    /// Parse scaling configuration from TLisp value
    fn parse_scaling_config(_value: &Value) -> TlispResult<AutoScalingConfig> {
        // This is a simplified parser
        Ok(AutoScalingConfig::default())
    }
}

/// Serverless function configuration for TLisp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerlessFunctionConfig {
    /// Memory limit
    pub memory_limit: usize,
    /// Timeout duration
    pub timeout: Duration,
    /// Concurrency limit
    pub concurrency: usize,
    /// Wake triggers
    pub wake_triggers: Vec<WakeTrigger>,
    /// Environment variables
    pub environment: HashMap<String, String>,
}

impl Default for ServerlessFunctionConfig {
    fn default() -> Self {
        ServerlessFunctionConfig {
            memory_limit: 128 * 1024 * 1024, // 128MB
            timeout: Duration::from_secs(30),
            concurrency: 100,
            wake_triggers: Vec::new(),
            environment: HashMap::new(),
        }
    }
}

/// Serverless deployment configuration for TLisp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerlessDeploymentConfig {
    /// Runtime configuration
    pub runtime: String,
    /// Functions in deployment
    pub functions: Vec<String>,
    /// Auto-scaling configuration
    pub auto_scaling: AutoScalingConfig,
    /// Monitoring configuration
    pub monitoring: MonitoringConfig,
}

impl Default for ServerlessDeploymentConfig {
    fn default() -> Self {
        ServerlessDeploymentConfig {
            runtime: "ream-serverless-1.0".to_string(),
            functions: Vec::new(),
            auto_scaling: AutoScalingConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

/// TLisp serverless macro utilities
pub struct ServerlessMacros;

impl ServerlessMacros {
    /// Create hibernable actor macro
    pub fn define_hibernable_actor() -> String {
        r#"
(define-macro define-hibernable-actor (name state-vars hibernation-policy . handlers)
  `(define-actor ,name
     (state ,@state-vars)
     (hibernation-policy ,hibernation-policy)
     (message-handlers ,@handlers)))
"#.to_string()
    }
    
    /// Create serverless function macro
    pub fn define_serverless_function_macro() -> String {
        r#"
(define-macro define-serverless-function (name config . body)
  `(define-function ,name
     (serverless-config ,config)
     (lambda (request)
       ,@body)))
"#.to_string()
    }
    
    /// Create cold start optimizer macro
    pub fn define_cold_start_optimizer_macro() -> String {
        r#"
(define-macro define-cold-start-optimizer (. config)
  `(cold-start-optimizer
     ,@config))
"#.to_string()
    }
    
    /// Create auto-scaling policy macro
    pub fn define_auto_scaling_macro() -> String {
        r#"
(define-macro define-auto-scaling (name . config)
  `(auto-scaling-policy ,name
     ,@config))
"#.to_string()
    }
}

/// Serverless TLisp standard library functions
pub struct ServerlessStdLib;

impl ServerlessStdLib {
    /// Get all serverless standard library functions
    pub fn get_functions() -> HashMap<String, String> {
        let mut functions = HashMap::new();
        
        functions.insert("hibernate-self".to_string(), 
            "(define hibernate-self (lambda () (system-hibernate (self))))".to_string());
        
        functions.insert("wake-actor".to_string(),
            "(define wake-actor (lambda (pid) (system-wake pid)))".to_string());
        
        functions.insert("get-hibernation-stats".to_string(),
            "(define get-hibernation-stats (lambda () (system-hibernation-stats)))".to_string());
        
        functions.insert("get-cold-start-stats".to_string(),
            "(define get-cold-start-stats (lambda () (system-cold-start-stats)))".to_string());
        
        functions.insert("scale-function".to_string(),
            "(define scale-function (lambda (name instances) (system-scale name instances)))".to_string());
        
        functions.insert("invoke-serverless".to_string(),
            "(define invoke-serverless (lambda (name payload) (system-invoke name payload)))".to_string());
        
        functions
    }
    
    /// Get serverless utility functions
    pub fn get_utilities() -> HashMap<String, String> {
        let mut utilities = HashMap::new();
        
        utilities.insert("memory-usage".to_string(),
            "(define memory-usage (lambda () (system-memory-usage)))".to_string());
        
        utilities.insert("cpu-usage".to_string(),
            "(define cpu-usage (lambda () (system-cpu-usage)))".to_string());
        
        utilities.insert("is-hibernating?".to_string(),
            "(define is-hibernating? (lambda (pid) (system-is-hibernating pid)))".to_string());
        
        utilities.insert("hibernation-time".to_string(),
            "(define hibernation-time (lambda (pid) (system-hibernation-time pid)))".to_string());
        
        utilities
    }
}
