use stylepack_lib::compile::CompileRecord;
use stylepack_lib::util::hash::hash_bytes;
use stylepack_lib::{BundleOutcome, Config, compile};

use super::common::{Site, block_on};

const CONFIG: &str = r#"
root: theme
output: public/css
stylesheets:
  screen: [reset.css, ./layout/**/*]
  widgets: [./widgets/*]
"#;

fn site() -> Site {
  let site = Site::new(&[
    ("reset.css", "html{}\n"),
    ("layout/a.css", "a{}\n"),
    ("layout/deep/b.css", "b{}\n"),
    ("widgets/tabs.css", "tabs{}\n"),
  ]);
  site.write("stylepack.yaml", CONFIG);
  site
}

#[test]
fn compile_from_config_file() {
  let site = site();
  let config = Config::load(&site.base.join("stylepack.yaml")).unwrap();

  let report = block_on(compile(&config, &[])).unwrap();

  assert!(report.is_success());
  assert_eq!(site.read("public/css/screen.css"), "html{}\na{}\nb{}\n");
  assert_eq!(site.read("public/css/widgets.css"), "tabs{}\n");
}

#[test]
fn record_digest_matches_published_bytes() {
  let site = site();
  let config = Config::load(&site.base.join("stylepack.yaml")).unwrap();
  block_on(compile(&config, &[])).unwrap();

  let record = CompileRecord::load(&site.base.join("public/css")).unwrap().unwrap();
  let screen = &record.bundles["screen"];
  let bytes = std::fs::read(site.base.join("public/css/screen.css")).unwrap();

  assert_eq!(screen.digest, hash_bytes(&bytes));
  assert_eq!(screen.size, bytes.len() as u64);
}

#[test]
fn recompiling_is_byte_identical() {
  let site = site();
  let config = Config::load(&site.base.join("stylepack.yaml")).unwrap();

  block_on(compile(&config, &[])).unwrap();
  let first = site.read("public/css/screen.css");
  let record = site.read("public/css/manifest.json");

  block_on(compile(&config, &[])).unwrap();
  assert_eq!(site.read("public/css/screen.css"), first);
  assert_eq!(site.read("public/css/manifest.json"), record);
}

#[test]
fn no_placeholder_is_left_in_the_theme() {
  let site = site();
  let config = Config::load(&site.base.join("stylepack.yaml")).unwrap();

  let report = block_on(compile(&config, &[])).unwrap();

  assert!(matches!(report.outcomes["screen"], BundleOutcome::Compiled(_)));
  assert!(!site.theme().join("screen.css").exists());
  assert!(!site.theme().join("widgets.css").exists());
}
