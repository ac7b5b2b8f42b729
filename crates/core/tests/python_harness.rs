//! End-to-end tests of the harness against a real interpreter.
//!
//! Each test checks that `python3` can import matplotlib and numpy first and returns
//! early (printing a note) when they are unavailable.

use std::time::Duration;

use assert_matches::assert_matches;
use chartgen_core::chart::{
    ChartError, ChartOutcome, ChartRenderer, RenderOptions, MAX_CAPTURED_OUTPUT_CHARS,
    NO_FIGURE_MESSAGE, REQUIRED_MODULES, TRUNCATION_MARKER,
};
use chartgen_core::scripting::python::PythonExecutor;

async fn renderer_or_skip(options: RenderOptions) -> Option<ChartRenderer> {
    let executor = PythonExecutor::default();
    if let Err(e) = executor.check_imports(REQUIRED_MODULES, Duration::from_secs(30)).await {
        eprintln!("skipping: matplotlib/numpy unavailable ({e})");
        return None;
    }
    Some(ChartRenderer::new(executor, options))
}

#[tokio::test]
async fn figure_code_returns_png() {
    let Some(renderer) = renderer_or_skip(RenderOptions::default()).await else {
        return;
    };

    let code = "x = np.arange(5)\nfig, ax = plt.subplots()\nax.bar(x, x ** 2)\n";
    let outcome = renderer.render(code).await.expect("render");

    let image = assert_matches!(outcome, ChartOutcome::Image(image) => image);
    assert!(!image.base64.is_empty());
    assert!(image.width > 0 && image.height > 0);
    // PNG signature, base64-encoded.
    assert!(image.base64.starts_with("iVBORw0KGgo"));
}

#[tokio::test]
async fn print_only_code_returns_message_with_output() {
    let Some(renderer) = renderer_or_skip(RenderOptions::default()).await else {
        return;
    };

    let outcome = renderer
        .render("print('total', sum(range(4)))")
        .await
        .expect("render");

    assert_eq!(
        outcome,
        ChartOutcome::Message("No Matplotlib figure was created by your code.total 6\n".into())
    );
}

#[tokio::test]
async fn raising_code_returns_traceback() {
    let Some(renderer) = renderer_or_skip(RenderOptions::default()).await else {
        return;
    };

    let outcome = renderer
        .render("print('before')\n1 / 0\n")
        .await
        .expect("render");

    let text = assert_matches!(outcome, ChartOutcome::Failed(text) => text);
    assert!(text.starts_with("Traceback"), "got: {text}");
    assert!(text.contains("ZeroDivisionError"));
    assert!(text.contains("<user_code>"));
}

#[tokio::test]
async fn syntax_error_is_reported() {
    let Some(renderer) = renderer_or_skip(RenderOptions::default()).await else {
        return;
    };

    let outcome = renderer.render("def broken(:\n").await.expect("render");
    let text = assert_matches!(outcome, ChartOutcome::Failed(text) => text);
    assert!(text.contains("SyntaxError"));
}

#[tokio::test]
async fn figures_do_not_leak_between_runs() {
    let Some(renderer) = renderer_or_skip(RenderOptions::default()).await else {
        return;
    };

    let first = renderer.render("plt.figure()\nplt.plot([1, 2, 3])").await.expect("render");
    assert_matches!(first, ChartOutcome::Image(_));

    let second = renderer.render("x = 1").await.expect("render");
    assert_matches!(second, ChartOutcome::Message(_));
}

#[tokio::test]
async fn descriptor_level_writes_do_not_corrupt_report() {
    let Some(renderer) = renderer_or_skip(RenderOptions::default()).await else {
        return;
    };

    let code = "import os\nos.write(1, b'raw bytes\\n')\nprint('kept')\n";
    let outcome = renderer.render(code).await.expect("render");
    assert_eq!(
        outcome,
        ChartOutcome::Message("No Matplotlib figure was created by your code.kept\n".into())
    );
}

#[tokio::test]
async fn printing_and_plotting_returns_only_the_image() {
    let Some(renderer) = renderer_or_skip(RenderOptions::default()).await else {
        return;
    };

    let code = "print('computing')\nplt.plot([3, 1, 2])\nprint('done')\n";
    let outcome = renderer.render(code).await.expect("render");
    let image = assert_matches!(outcome, ChartOutcome::Image(image) => image);
    assert!(image.base64.starts_with("iVBORw0KGgo"));
}

#[tokio::test]
async fn oversized_output_is_truncated() {
    let options = RenderOptions {
        timeout: Duration::from_secs(60),
        ..RenderOptions::default()
    };
    let Some(renderer) = renderer_or_skip(options).await else {
        return;
    };

    // 11 MiB of text, past both the capture limit and the pipe cap.
    let code = "import sys\nfor _ in range(11):\n    sys.stdout.write('x' * (1024 * 1024))\n";
    let outcome = renderer.render(code).await.expect("render");

    let message = assert_matches!(outcome, ChartOutcome::Message(message) => message);
    assert!(message.starts_with(NO_FIGURE_MESSAGE));
    assert!(message.ends_with(TRUNCATION_MARKER));
    assert_eq!(
        message.len(),
        NO_FIGURE_MESSAGE.len() + MAX_CAPTURED_OUTPUT_CHARS + TRUNCATION_MARKER.len()
    );
}

#[tokio::test]
async fn oversized_descriptor_level_output_does_not_stall() {
    let options = RenderOptions {
        timeout: Duration::from_secs(60),
        ..RenderOptions::default()
    };
    let Some(renderer) = renderer_or_skip(options).await else {
        return;
    };

    let code = "import os\nfor _ in range(12):\n    os.write(1, b'y' * (1024 * 1024))\nplt.plot([1])\n";
    let outcome = renderer.render(code).await.expect("render");
    assert_matches!(outcome, ChartOutcome::Image(_));
}

#[tokio::test]
async fn long_running_code_times_out() {
    let options = RenderOptions {
        timeout: Duration::from_secs(2),
        ..RenderOptions::default()
    };
    let Some(renderer) = renderer_or_skip(options).await else {
        return;
    };

    let result = renderer.render("import time\ntime.sleep(30)").await;
    assert_matches!(result, Err(ChartError::Timeout { .. }));
}
