//! Renderer integration tests: options, search paths and scoping together.

use std::fs;
use std::path::Path;

use minijinja::value::Value;
use tempfile::TempDir;
use vignette_render::{RenderError, Renderer, RendererOptions, TemplatePath};

fn create_template_file(dir: &Path, relative_path: &str, content: &str) {
    let full_path = dir.join(relative_path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&full_path, content).unwrap();
}

#[test]
fn test_full_tree_with_partials_and_layout_dir() {
    let dir = TempDir::new().unwrap();
    create_template_file(
        dir.path(),
        "users/show.html.jinja",
        "{% include 'users/_row' %}",
    );
    create_template_file(dir.path(), "users/_row.html.jinja", "row: {{ id }}");
    create_template_file(dir.path(), "layouts/app.html.jinja", "[{{ content }}]");

    let renderer = Renderer::new(
        &[TemplatePath::new(dir.path())],
        "html",
        &RendererOptions::new(),
    )
    .unwrap();
    assert_eq!(renderer.template_count(), 3);

    let body = renderer
        .template("users/show", &Value::from_iter([("id", 7)]))
        .unwrap();
    assert_eq!(body, "row: 7");

    let layout = renderer
        .chdir("layouts")
        .template("app", &Value::from_iter([("content", body.as_str())]))
        .unwrap();
    assert_eq!(layout, "[row: 7]");
}

#[test]
fn test_options_flow_into_the_engine() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "page.html.jinja", "{{ body }}");

    let paths = [TemplatePath::new(dir.path())];

    // Default: no escaping.
    let plain = Renderer::new(&paths, "html", &RendererOptions::new()).unwrap();
    let output = plain
        .template("page", &Value::from_iter([("body", "<b>x</b>")]))
        .unwrap();
    assert_eq!(output, "<b>x</b>");

    // Overriding the default key switches escaping on.
    let escaping = Renderer::new(
        &paths,
        "html",
        &RendererOptions::new().set("auto_escape", "html"),
    )
    .unwrap();
    let output = escaping
        .template("page", &Value::from_iter([("body", "<b>x</b>")]))
        .unwrap();
    assert_eq!(output, "&lt;b&gt;x&lt;/b&gt;");
}

#[test]
fn test_strict_undefined_surfaces_template_errors() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "page.html.jinja", "{{ missing }}");

    let renderer = Renderer::new(
        &[TemplatePath::new(dir.path())],
        "html",
        &RendererOptions::new().set("undefined_behavior", "strict"),
    )
    .unwrap();

    let result = renderer.template("page", &Value::from_iter([("present", 1)]));
    assert!(matches!(result, Err(RenderError::Template(_))));
}

#[test]
fn test_invalid_option_fails_construction() {
    let dir = TempDir::new().unwrap();
    let result = Renderer::new(
        &[TemplatePath::new(dir.path())],
        "html",
        &RendererOptions::new().set("no_such_option", 1),
    );
    assert!(matches!(result, Err(RenderError::InvalidOption(_))));
}
