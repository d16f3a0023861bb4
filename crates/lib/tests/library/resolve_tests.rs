use stylepack_lib::{AssetEnvironment, BundleSpec, ResolveError, Resolver};

use super::common::{Site, names};

fn theme_site() -> Site {
  Site::new(&[
    ("reset.css", "/* reset */\n"),
    ("layout/grid.css", "/* grid */\n"),
    ("layout/header.css", "/* header */\n"),
    ("layout/mobile/phone.css", "/* phone */\n"),
    ("layout/README.md", "not css"),
    ("widgets/tabs.css", "/* tabs */\n"),
  ])
}

#[test]
fn typical_bundle_resolves_in_discovery_order() {
  let site = theme_site();
  let resolver = Resolver::new(AssetEnvironment::new(site.theme()));

  let manifest = resolver
    .resolve(&BundleSpec::new(
      "screen",
      ["reset", "./layout/**/*", "./widgets/*", "layout/grid.css"],
    ))
    .unwrap();

  assert_eq!(
    names(&site.theme(), &manifest.files),
    vec![
      "reset.css",
      "layout/grid.css",
      "layout/header.css",
      "layout/mobile/phone.css",
      "widgets/tabs.css"
    ]
  );
}

#[test]
fn directory_directive_ignores_nested_directories() {
  let site = theme_site();
  let resolver = Resolver::new(AssetEnvironment::new(site.theme()));

  let manifest = resolver.resolve(&BundleSpec::new("screen", ["./layout/*"])).unwrap();

  assert_eq!(
    names(&site.theme(), &manifest.files),
    vec!["layout/grid.css", "layout/header.css"]
  );
  let deps: Vec<_> = manifest.dependencies.iter().cloned().collect();
  assert_eq!(names(&site.theme(), &deps), vec!["layout"]);
}

#[test]
fn extra_search_paths_serve_bare_requires() {
  let site = theme_site();
  site.write("vendor/normalize.css", "/* normalize */\n");
  let env = AssetEnvironment::new(site.theme()).append_path(site.base.join("vendor"));

  let manifest = Resolver::new(env)
    .resolve(&BundleSpec::new("screen", ["normalize", "reset"]))
    .unwrap();

  assert_eq!(
    manifest.files,
    vec![site.base.join("vendor/normalize.css"), site.theme().join("reset.css")]
  );
}

#[test]
fn escaping_the_theme_is_rejected() {
  let site = theme_site();
  site.write("outside/x.css", "");
  let resolver = Resolver::new(AssetEnvironment::new(site.theme()));

  let err = resolver
    .resolve(&BundleSpec::new("screen", ["../outside/*"]))
    .unwrap_err();

  assert!(matches!(err.source, ResolveError::InvalidDirective { .. }));
}

#[test]
fn failure_names_the_offending_token() {
  let site = theme_site();
  let resolver = Resolver::new(AssetEnvironment::new(site.theme()));

  let err = resolver
    .resolve(&BundleSpec::new("screen", ["reset", "./missing/**/*"]))
    .unwrap_err();

  assert_eq!(err.token, "./missing/**/*");
  assert!(matches!(err.source, ResolveError::NotADirectory { .. }));
  assert!(err.to_string().contains("screen"));
}
