//! A test target that hosts its own tests and runs them through the libtest
//! engine with no explicit target

use selfrunner::{Failed, Trial};
use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::rc::Rc;
use tempfile::TempDir;

fn hosted_tests() -> Vec<Trial> {
    vec![
        Trial::test("math::adds", || {
            assert_eq!(1 + 1, 2);
            Ok(())
        }),
        Trial::test("math::fails", || {
            println!("context: left=1 right=2");
            Err(Failed::from("values differ"))
        }),
        Trial::test("math::slow", || Ok(())).with_ignored_flag(true),
        Trial::test("env::reads_seed", || match std::env::var("SEED").as_deref() {
            Ok("7") => Ok(()),
            other => Err(format!("SEED was {other:?}").into()),
        }),
    ]
}

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn run_self(args: &[&str]) -> String {
    let out = SharedBuf::default();
    let argv = std::iter::once("self_hosted").chain(args.iter().copied());
    selfrunner::run(argv, None, Some(Box::new(out.clone()))).unwrap();
    out.text()
}

fn test_explore_lists_hosted_tests() {
    let text = run_self(&["--explore"]);

    assert!(text.starts_with("<test-run "), "{text}");
    assert!(text.contains(r#"testcasecount="4""#), "{text}");
    assert!(text.contains(r#"fullname="math::adds" classname="math" runstate="Runnable""#));
    assert!(text.contains(r#"fullname="math::slow" classname="math" runstate="Ignored""#));
}

fn test_run_reports_hosted_outcomes() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.xml");
    let output_arg = output.to_string_lossy().into_owned();

    let text = run_self(&["-s", "SEED=7", "-o", &output_arg]);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains(
        r#"result="Failed" total="4" passed="2" failed="1" skipped="1""#
    ), "{written}");
    assert!(written.contains(r#"fullname="math::adds" classname="math" result="Passed""#));
    assert!(written.contains(r#"fullname="env::reads_seed" classname="env" result="Passed""#));
    assert!(written.contains(r#"fullname="math::slow" classname="math" result="Skipped""#));

    // both streams of the failing test make up its message
    assert!(written.contains("context: left=1 right=2"), "{written}");
    assert!(written.contains("values differ"), "{written}");

    assert!(text.starts_with(r#"<start-run name="#));
    assert!(text.trim_end().ends_with(&written));
}

fn main() {
    let args: Vec<OsString> = std::env::args_os().collect();
    if selfrunner::is_harness_invocation(&args) {
        if let Err(e) = selfrunner::run_tests(args, hosted_tests()) {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
        return;
    }

    test_explore_lists_hosted_tests();
    test_run_reports_hosted_outcomes();
    println!("self-hosted run: ok");
}
