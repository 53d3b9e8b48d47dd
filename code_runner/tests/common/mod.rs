#![allow(dead_code)]

use code_runner::ExecutionConfig;
use marker::ClassifierPolicy;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use util::valgrind_report::ReportFilters;

pub const CLEAN_LOG: &str = "\
==4242== Memcheck, a memory error detector
==4242== Command: /bin/sh
==4242==
==4242== HEAP SUMMARY:
==4242==     in use at exit: 208 bytes in 3 blocks
==4242== 208 bytes in 3 blocks are still reachable in loss record 1 of 1
   by 0x48A1C3: xmalloc (in /usr/lib/x86_64-linux-gnu/libreadline.so.8.2)
==4242== LEAK SUMMARY:
==4242==    definitely lost: 0 bytes in 0 blocks
==4242==    indirectly lost: 0 bytes in 0 blocks
==4242==      possibly lost: 0 bytes in 0 blocks
==4242==    still reachable: 208 bytes in 3 blocks
==4242== ERROR SUMMARY: 0 errors from 0 contexts (suppressed: 0 from 0)
";

pub const LEAKY_LOG: &str = "\
==4242== Memcheck, a memory error detector
==4242== Invalid free() / delete / delete[] / realloc()
   at 0x484988F: free (vg_replace_malloc.c:989)
   by 0x10B2C4: ft_free_tab (in /home/u/minishell)
==4242== 16 bytes in 1 blocks are still reachable in loss record 1 of 2
   at 0x4846828: malloc (vg_replace_malloc.c:446)
   by 0x10A1B2: ft_strdup (in /home/u/minishell)
==4242== 72 bytes in 3 blocks are definitely lost in loss record 2 of 2
==4242== LEAK SUMMARY:
==4242==    definitely lost: 72 bytes in 3 blocks
==4242==    indirectly lost: 0 bytes in 0 blocks
==4242==      possibly lost: 0 bytes in 0 blocks
==4242== ERROR SUMMARY: 1 errors from 1 contexts (suppressed: 0 from 0)
";

pub const SEGV_LOG: &str = "\
==4242== Process terminating with default action of signal 11 (SIGSEGV)
==4242==  Access not within mapped region at address 0x0
==4242== LEAK SUMMARY:
==4242==    definitely lost: 0 bytes in 0 blocks
==4242== ERROR SUMMARY: 0 errors from 0 contexts (suppressed: 0 from 0)
";

/// A stand-in for memcheck: runs the target with the piped script, then
/// writes a canned log picked by what the target printed.
pub struct FakeTool {
    pub dir: TempDir,
    pub script: PathBuf,
    pub report_dir: PathBuf,
}

enum Behaviour {
    /// Runs the target, picks a log from what it printed.
    Echo,
    /// Never returns on its own.
    Hang,
    /// Writes the clean log and closes stdin without reading any of it.
    CloseStdin,
}

/// Parses `--log-file=` out of the tool's arguments into `$log`.
const ARG_LOOP: &str = r#"log=""
target=""
for arg in "$@"; do
  case "$arg" in
    --log-file=*) log="${arg#--log-file=}" ;;
    --*) ;;
    *) target="$arg" ;;
  esac
done
"#;

impl FakeTool {
    pub fn new() -> Self {
        Self::with_behaviour(Behaviour::Echo)
    }

    pub fn hanging() -> Self {
        Self::with_behaviour(Behaviour::Hang)
    }

    /// Tool that exits without consuming its input.
    pub fn closing_stdin() -> Self {
        Self::with_behaviour(Behaviour::CloseStdin)
    }

    fn with_behaviour(behaviour: Behaviour) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let clean = dir.path().join("clean.log");
        let leaky = dir.path().join("leaky.log");
        let segv = dir.path().join("segv.log");
        fs::write(&clean, CLEAN_LOG).unwrap();
        fs::write(&leaky, LEAKY_LOG).unwrap();
        fs::write(&segv, SEGV_LOG).unwrap();

        let body = match behaviour {
            Behaviour::Hang => "sleep 30\n".to_string(),
            Behaviour::CloseStdin => format!(
                "{ARG_LOOP}cat '{clean}' > \"$log\"\nexec 0<&-\n",
                clean = clean.display(),
            ),
            Behaviour::Echo => format!(
                r#"{ARG_LOOP}out=$("$target")
printf '%s\n' "$out"
echo "==4242== Memcheck, a memory error detector" >&2
case "$out" in
  *LEAK*) cat '{leaky}' > "$log" ;;
  *SEGV*) cat '{segv}' > "$log" ;;
  *NOREPORT*) ;;
  *) cat '{clean}' > "$log" ;;
esac
"#,
                leaky = leaky.display(),
                segv = segv.display(),
                clean = clean.display(),
            ),
        };

        let script = dir.path().join("fake_valgrind.sh");
        fs::write(&script, body).unwrap();
        let report_dir = dir.path().join("valgrind_reports");

        Self {
            dir,
            script,
            report_dir,
        }
    }

    pub fn config(&self, policy: ClassifierPolicy) -> ExecutionConfig {
        ExecutionConfig {
            tool: PathBuf::from("/bin/sh"),
            tool_args: vec![self.script.display().to_string()],
            shell_binary: PathBuf::from("/bin/sh"),
            report_dir: self.report_dir.clone(),
            timeout_secs: 10,
            policy,
            filters: ReportFilters::default(),
        }
    }
}
