/*!
 * Common test utilities for the pagevoice test suite
 */

use std::path::PathBuf;
use std::fs;
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use pagevoice::app_config::Config;
use pagevoice::app_controller::AppController;
use pagevoice::assistant::AssistantService;
use pagevoice::providers::mock::{MockProvider, MockRequest};
use pagevoice::speech::mock::MockSpeechPlatform;

/// A representative article page with navigation and footer noise
pub const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Rust in Production</title></head>
<body>
  <nav><a href="/">Home</a> <a href="/about">About</a></nav>
  <article>
    <h1>Rust in Production</h1>
    <p>Rust has moved from research projects into everyday infrastructure.</p>
    <p>Teams report fewer memory bugs and easier refactoring at scale.</p>
  </article>
  <footer>Copyright 2026 Example Corp</footer>
</body>
</html>"#;

/// A page with no readable text at all
pub const EMPTY_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Blank</title></head>
<body>
  <nav>Menu</nav>
  <script>console.log("nothing here");</script>
</body>
</html>"#;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Response generator that answers summarize and translate prompts with
/// distinguishable canned texts, wrapped the way chatty models wrap them
pub fn scripted_assistant_response(request: &MockRequest) -> String {
    if request.prompt.starts_with("Translate the following") {
        "Translation:\n- Rustは本番環境で使われている".to_string()
    } else {
        "Here is the summary:\n- Rust is used in production\n- Teams report fewer bugs".to_string()
    }
}

/// Build a controller wired to a mock assistant provider and a mock speech
/// platform, mirroring how the binary wires the real ones
pub fn build_controller(provider: MockProvider, platform: MockSpeechPlatform) -> AppController {
    AppController::with_assistant(
        Config::default(),
        Arc::new(platform),
        AssistantService::with_mock(provider),
    )
}

/// Controller with a working scripted assistant and a default speech catalog
pub fn working_controller() -> (AppController, MockProvider, MockSpeechPlatform) {
    let provider = MockProvider::working().with_custom_response(scripted_assistant_response);
    let platform = MockSpeechPlatform::new(MockSpeechPlatform::default_catalog());
    let controller = build_controller(provider.clone(), platform.clone());
    (controller, provider, platform)
}
