use std::{
    fs,
    path::{Path, PathBuf},
};

use demin::{config::Config, orchestrator::deminify_file};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn config(output_folder: &Path) -> Config {
    Config {
        output_folder: Some(output_folder.to_path_buf()),
        ..Default::default()
    }
}

/// Every file under `dir`, as sorted `/`-separated relative paths
fn files(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                out.push(parts.join("/"));
            }
        }
    }

    let mut out = Vec::new();
    if dir.exists() {
        walk(dir, dir, &mut out);
    }
    out.sort();
    out
}

/// Each emitted file followed by its import lines
fn import_summary(dir: &Path) -> String {
    let mut summary = String::new();
    for file in files(dir) {
        summary.push_str(&file);
        summary.push('\n');
        let contents = fs::read_to_string(dir.join(&file)).unwrap();
        for line in contents.lines().filter(|line| line.starts_with("import ")) {
            summary.push_str("  ");
            summary.push_str(line);
            summary.push('\n');
        }
    }
    summary
}

#[test]
fn test_bundle_is_split_into_modules() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");

    let emitted = deminify_file(&fixture("bundle.js"), &config(&output)).unwrap();

    assert_eq!(emitted, 4);
    assert_eq!(
        files(&output),
        vec![
            "app/main.js",
            "app/model.js",
            "lib/util.js",
            "tpl/main.html"
        ]
    );
    assert_eq!(
        fs::read_to_string(output.join("tpl/main.html")).unwrap(),
        "<main></main>"
    );

    let util = fs::read_to_string(output.join("lib/util.js")).unwrap();
    assert!(util.contains("exports.trim = function"), "{util}");
    assert!(util.contains("exports.default = {"), "{util}");

    let model = fs::read_to_string(output.join("app/model.js")).unwrap();
    assert!(model.contains("var Util = UtilDefault;"), "{model}");
    assert!(model.contains("return require(\"lib/data\");"), "{model}");
    assert!(model.contains("exports.clean = Util1.trim;"), "{model}");

    let main = fs::read_to_string(output.join("app/main.js")).unwrap();
    assert!(main.contains("Model.load(Util.trim(MainHtml));"), "{main}");
    assert!(main.contains("return true;"), "{main}");
}

#[test]
fn test_import_summary() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");

    deminify_file(&fixture("bundle.js"), &config(&output)).unwrap();

    insta::assert_snapshot!("import_summary", import_summary(&output));
}

#[test]
fn test_limit_caps_emitted_modules() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    let config = Config {
        limit: Some(2),
        ..config(&output)
    };

    let emitted = deminify_file(&fixture("bundle.js"), &config).unwrap();

    assert_eq!(emitted, 2);
    assert_eq!(files(&output), vec!["app/model.js", "lib/util.js"]);
}

#[test]
fn test_clean_removes_stale_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    fs::create_dir_all(output.join("old")).unwrap();
    fs::write(output.join("old/stale.js"), "stale").unwrap();

    let config = Config {
        clean: true,
        ..config(&output)
    };
    deminify_file(&fixture("bundle.js"), &config).unwrap();

    assert!(!output.join("old").exists());
    assert!(output.join("app/main.js").is_file());
}

#[test]
fn test_clean_of_missing_folder_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("never-created");
    let config = Config {
        clean: true,
        ..config(&output)
    };

    assert_eq!(deminify_file(&fixture("bundle.js"), &config).unwrap(), 4);
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("stale.js"), "stale").unwrap();

    let config = Config {
        dry: true,
        clean: true,
        ..config(&output)
    };
    let emitted = deminify_file(&fixture("bundle.js"), &config).unwrap();

    assert_eq!(emitted, 4);
    assert_eq!(files(&output), vec!["stale.js"]);
}

#[test]
fn test_syntax_error_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("broken.js");
    fs::write(&input, "define('a', ['b'], function (b) {").unwrap();

    let err = deminify_file(&input, &config(&temp_dir.path().join("out"))).unwrap_err();

    assert!(err.to_string().contains("broken.js:1:"), "{err}");
    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_missing_output_folder_is_an_error() {
    let err = deminify_file(&fixture("bundle.js"), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("output folder"), "{err}");
}

#[test]
fn test_missing_input_names_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = deminify_file(
        &temp_dir.path().join("nope.js"),
        &config(&temp_dir.path().join("out")),
    )
    .unwrap_err();
    assert!(err.to_string().contains("nope.js"), "{err}");
}
