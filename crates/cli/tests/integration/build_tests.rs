//! Build command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_writes_site_into_configured_dir() {
  let env = TestEnv::with_config(r#"{ "build_dir": "site" }"#);
  env.seed_site();

  env
    .build_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Built site"))
    .stdout(predicate::str::contains("native"));

  assert!(env.exists("site/index.html"));
  assert!(env.exists("site/assets/site.css"));
  assert!(env.exists("site/spa/layouts/page.html"));
  assert!(env.exists("site/spa/ejected/main.js"));
  assert!(env.exists("site/spa/ejected/content.js"));
  assert!(env.exists("site/pages/about/index.json"));
  assert!(env.exists("site/spa/web_modules/folio-router.js"));
  assert!(!env.exists("public"));
}

#[test]
fn dir_flag_overrides_config() {
  let env = TestEnv::with_config(r#"{ "build_dir": "public" }"#);
  env.seed_site();

  env.build_cmd().args(["--dir", "out"]).assert().success();

  assert!(env.exists("out/index.html"));
  assert!(!env.exists("public"));
}

#[test]
fn build_removes_newly_ejected_files_and_keeps_user_ones() {
  let env = TestEnv::with_config("{}");
  env.seed_site();
  env.write_file("ejected/router.js", "export default 'custom';");

  env.build_cmd().assert().success();

  assert_eq!(env.read_file("ejected/router.js"), "export default 'custom';");
  assert!(!env.exists("ejected/main.js"));
  assert!(!env.exists("ejected/shell.html"));
  assert!(env.read_file("public/spa/ejected/router.js").contains("custom"));
}

#[test]
fn rebuild_clears_stale_output() {
  let env = TestEnv::with_config("{}");
  env.seed_site();

  env.build_cmd().assert().success();
  env.write_file("public/stale.html", "old");
  env.build_cmd().assert().success();

  assert!(!env.exists("public/stale.html"));
  assert!(env.exists("public/index.html"));
}

#[test]
fn themed_build_layers_project_over_theme() {
  let env = TestEnv::with_config(r#"{ "theme": "mytheme", "theme_config": { "mytheme": { "exclude": ["demo"] } } }"#);
  env.write_file("themes/mytheme/layouts/page.html", "<main>theme</main>");
  env.write_file("themes/mytheme/assets/theme.css", "a {}");
  env.write_file("themes/mytheme/assets/site.css", "theme wins?");
  env.write_file("themes/mytheme/demo/content/pages/demo.json", "{}");
  env.write_file("assets/site.css", "project wins");

  env
    .build_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("mytheme"));

  assert_eq!(env.read_file("public/assets/site.css"), "project wins");
  assert_eq!(env.read_file("public/assets/theme.css"), "a {}");
  assert_eq!(env.read_file("public/spa/layouts/page.html"), "<main>theme</main>");
  assert!(!env.exists(".folio-build"));
  assert!(!env.exists("ejected"));
}

#[test]
fn missing_theme_fails_with_exit_code_one() {
  let env = TestEnv::with_config(r#"{ "theme": "ghost" }"#);

  env
    .build_cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("theme stage failed"));
}

#[test]
fn project_root_as_output_is_refused() {
  let env = TestEnv::with_config("{}");
  env.seed_site();

  env
    .build_cmd()
    .args(["--dir", "."])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("contains the project root"));

  assert!(env.exists("folio.json"));
  assert!(env.exists("content/index.json"));
}

#[test]
fn ancestors_of_project_root_are_refused() {
  let env = TestEnv::empty();
  env.write_file("keep.txt", "precious");
  env.write_file("site/folio.json", "{}");
  env.write_file("site/content/index.json", r#"{ "title": "Home" }"#);

  let absolute = env.root().to_string_lossy().into_owned();
  for dir in ["..", "./public/../..", absolute.as_str()] {
    env
      .build_cmd_in("site")
      .args(["--dir", dir])
      .assert()
      .code(1)
      .stderr(predicate::str::contains("contains the project root"));
  }

  assert_eq!(env.read_file("keep.txt"), "precious");
  assert!(env.exists("site/folio.json"));
  assert!(env.exists("site/content/index.json"));
}

#[test]
fn ejected_dir_as_output_is_refused() {
  let env = TestEnv::with_config("{}");
  env.seed_site();
  env.write_file("ejected/router.js", "export default 'custom';");

  env
    .build_cmd()
    .args(["--dir", "ejected"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("overlaps"));

  assert_eq!(env.read_file("ejected/router.js"), "export default 'custom';");
}

#[test]
fn theme_workspace_as_output_is_refused() {
  let env = TestEnv::with_config(r#"{ "theme": "mytheme" }"#);
  env.write_file("themes/mytheme/layouts/page.html", "<main>theme</main>");

  for dir in [".folio-build", "themes"] {
    env
      .build_cmd()
      .args(["--dir", dir])
      .assert()
      .code(1)
      .stderr(predicate::str::contains("overlaps"));
  }

  assert!(env.exists("themes/mytheme/layouts/page.html"));
}

#[test]
fn malformed_config_falls_back_to_defaults() {
  let env = TestEnv::with_config("{ not json");

  env
    .build_cmd()
    .assert()
    .success()
    .stderr(predicate::str::contains("using default site config"));

  assert!(env.exists("public/index.html"));
}

#[test]
fn malformed_content_fails_the_build() {
  let env = TestEnv::with_config("{}");
  env.write_file("content/pages/broken.json", "{");

  env
    .build_cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn benchmark_prints_stage_timings() {
  let env = TestEnv::with_config("{}");
  env.seed_site();

  env
    .build_cmd()
    .arg("--benchmark")
    .assert()
    .success()
    .stdout(predicate::str::contains("Timings:"))
    .stdout(predicate::str::contains("bundle"))
    .stdout(predicate::str::contains("total"));
}

#[test]
fn json_output_describes_build() {
  let env = TestEnv::with_config("{}");
  env.seed_site();

  let output = env.build_cmd().args(["--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["strategy"], "native");
  assert_eq!(report["cleanup"], "ejected_files");
  assert_eq!(report["ejected"], 3);
  assert!(report["theme"].is_null());
  assert_eq!(
    report["output_path"].as_str().map(std::path::PathBuf::from),
    Some(env.root().join("public"))
  );
}

#[test]
fn external_build_without_runtime_fails() {
  let env = TestEnv::with_config(r#"{ "runtime": "folio-missing-runtime" }"#);
  env.seed_site();

  env
    .build_cmd()
    .arg("--external")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("folio-missing-runtime"));

  assert!(!env.exists("public/index.html"));
}
