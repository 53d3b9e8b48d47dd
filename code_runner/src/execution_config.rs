use marker::ClassifierPolicy;
use serde::Deserialize;
use std::{ffi::OsString, path::Path, path::PathBuf};
use util::config;
use util::valgrind_report::ReportFilters;

/// Memcheck flags passed before `--log-file`.
pub const DEFAULT_TOOL_ARGS: [&str; 2] = ["--leak-check=full", "--show-leak-kinds=all"];

/// Everything one instrumented run needs to know about its environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    pub tool: PathBuf,            // Instrumentation binary (valgrind)
    pub tool_args: Vec<String>,   // Flags placed before --log-file
    pub shell_binary: PathBuf,    // Target executed under the tool
    pub report_dir: PathBuf,      // Where block_<id>.log files land
    pub timeout_secs: u64,        // Max wall time per block
    #[serde(default)]
    pub policy: ClassifierPolicy, // Verdict policy for the deployment
    #[serde(default)]
    pub filters: ReportFilters,   // Excerpt denylists for the parser
}

impl ExecutionConfig {
    /// Builds the config from the global `AppConfig`.
    ///
    /// Fails only when `CLASSIFIER_POLICY` names no known policy.
    pub fn from_app_config() -> Result<Self, marker::error::MarkerError> {
        Ok(Self {
            tool: PathBuf::from(config::valgrind_bin()),
            tool_args: DEFAULT_TOOL_ARGS.iter().map(|s| s.to_string()).collect(),
            shell_binary: PathBuf::from(config::shell_binary()),
            report_dir: PathBuf::from(config::report_dir()),
            timeout_secs: config::run_timeout_secs(),
            policy: config::classifier_policy().parse()?,
            filters: ReportFilters::from_config(),
        })
    }

    /// Argument vector after the tool itself:
    /// `<tool_args..> --log-file=<report> <shell_binary>`.
    pub fn tool_argv(&self, report_path: &Path) -> Vec<OsString> {
        let mut argv: Vec<OsString> = self.tool_args.iter().map(OsString::from).collect();
        let mut log_flag = OsString::from("--log-file=");
        log_flag.push(report_path.as_os_str());
        argv.push(log_flag);
        argv.push(self.shell_binary.clone().into_os_string());
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn sample() -> ExecutionConfig {
        ExecutionConfig {
            tool: PathBuf::from("valgrind"),
            tool_args: DEFAULT_TOOL_ARGS.iter().map(|s| s.to_string()).collect(),
            shell_binary: PathBuf::from("../minishell"),
            report_dir: PathBuf::from("valgrind_reports"),
            timeout_secs: 30,
            policy: ClassifierPolicy::Strict,
            filters: ReportFilters::default(),
        }
    }

    #[test]
    fn tool_argv_matches_memcheck_invocation() {
        let argv = sample().tool_argv(Path::new("valgrind_reports/block_3.log"));
        assert_eq!(
            argv,
            vec![
                OsString::from("--leak-check=full"),
                OsString::from("--show-leak-kinds=all"),
                OsString::from("--log-file=valgrind_reports/block_3.log"),
                OsString::from("../minishell"),
            ]
        );
    }

    #[test]
    fn policy_and_filters_default_when_absent_from_json() {
        let raw = r#"{
            "tool": "valgrind",
            "tool_args": [],
            "shell_binary": "./minishell",
            "report_dir": "reports",
            "timeout_secs": 10
        }"#;
        let cfg: ExecutionConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.policy, ClassifierPolicy::Strict);
        assert_eq!(cfg.filters, ReportFilters::default());
    }

    #[test]
    #[serial]
    fn from_app_config_reads_global_settings() {
        config::AppConfig::set_valgrind_bin("/opt/valgrind/bin/valgrind");
        config::AppConfig::set_shell_binary("./minishell");
        config::AppConfig::set_classifier_policy("Lenient");
        config::AppConfig::set_error_denylist(vec!["rl_".into()]);
        config::AppConfig::set_still_reachable_denylist(vec![]);

        let cfg = ExecutionConfig::from_app_config().unwrap();
        assert_eq!(cfg.tool, PathBuf::from("/opt/valgrind/bin/valgrind"));
        assert_eq!(cfg.shell_binary, PathBuf::from("./minishell"));
        assert_eq!(cfg.policy, ClassifierPolicy::Lenient);
        assert_eq!(cfg.filters.error_denylist, vec!["rl_".to_string()]);
        assert!(cfg.filters.still_reachable_denylist.is_empty());

        config::AppConfig::set_classifier_policy("paranoid");
        assert!(ExecutionConfig::from_app_config().is_err());

        config::AppConfig::reset();
    }
}
