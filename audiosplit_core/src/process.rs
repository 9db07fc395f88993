use std::ffi::OsStr;
use std::process::{Command, Output, Stdio};

/// Run `program` with `args` to completion, capturing both output streams.
///
/// Returns the spawn error as a message when the program cannot be started.
pub(crate) fn run_captured<I, S>(program: &OsStr, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    detach_from_terminal_signals(&mut command);

    command
        .output()
        .map_err(|err| format!("unable to execute '{}': {err}", program.to_string_lossy()))
}

/// Keep a terminal Ctrl-C from reaching the child, so cancellation only takes
/// effect between chunks.
#[cfg(unix)]
fn detach_from_terminal_signals(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Console control events are only delivered to the console's own process
/// group, and the child must not pop up a console window of its own.
#[cfg(windows)]
fn detach_from_terminal_signals(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    command.creation_flags(CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);
}

#[cfg(not(any(unix, windows)))]
fn detach_from_terminal_signals(_command: &mut Command) {}

/// Readable description of a failed process run.
pub(crate) fn failure_message(output: &Output) -> String {
    let stderr = last_lines(&String::from_utf8_lossy(&output.stderr), 5);
    let detail = if stderr.is_empty() {
        last_lines(&String::from_utf8_lossy(&output.stdout), 5)
    } else {
        stderr
    };

    if detail.is_empty() {
        format!("process exited with {}", output.status)
    } else {
        format!("process exited with {}: {detail}", output.status)
    }
}

fn last_lines(text: &str, count: usize) -> String {
    // ffmpeg redraws its status line with bare carriage returns.
    let lines: Vec<&str> = text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let skip = lines.len().saturating_sub(count);
    lines[skip..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_trailing_lines() {
        let text = "banner\n\nline 1\nline 2\n  line 3  \n";
        assert_eq!(last_lines(text, 2), "line 2\nline 3");
        assert_eq!(last_lines("", 3), "");
    }

    #[test]
    fn treats_carriage_returns_as_line_breaks() {
        let text = "size=1kB time=00:00:01\rsize=2kB time=00:00:02\r\nError opening output\r\n";
        assert_eq!(
            last_lines(text, 2),
            "size=2kB time=00:00:02\nError opening output"
        );
    }

    #[cfg(unix)]
    #[test]
    fn captures_output_of_detached_child() {
        let output =
            run_captured(OsStr::new("sh"), ["-c", "echo out; echo err >&2; exit 3"]).unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(
            failure_message(&output),
            format!("process exited with {}: err", output.status)
        );
    }

    #[cfg(windows)]
    #[test]
    fn captures_output_of_detached_child() {
        let output = run_captured(OsStr::new("cmd"), ["/C", "echo err 1>&2 & exit 3"]).unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert!(failure_message(&output).ends_with(": err"));
    }
}
