use convoy::compose::merge::load_merged;
use pretty_assertions::assert_eq;
use serde_yaml::Value;
use std::fs;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

fn get<'a>(mapping: &'a serde_yaml::Mapping, key: &str) -> &'a Value {
    mapping.get(&Value::from(key)).unwrap()
}

#[test]
fn empty_file_list_yields_empty_mapping() {
    let dir = TempDir::new().unwrap();
    let merged = load_merged(&[], dir.path());
    assert!(merged.is_empty());
}

#[test]
fn single_file_loads_as_is() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "docker-compose.yml",
        "services:\n  web:\n    image: nginx\n",
    );

    let merged = load_merged(&["docker-compose.yml".to_string()], dir.path());
    let services = get(&merged, "services").as_mapping().unwrap();
    assert!(services.contains_key(&Value::from("web")));
}

#[test]
fn scalars_are_overridden_by_the_later_file() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.yml", "version: \"3.8\"\n");
    write_file(&dir, "b.yml", "version: \"3.9\"\n");

    let merged = load_merged(&["a.yml".to_string(), "b.yml".to_string()], dir.path());
    assert_eq!(get(&merged, "version"), &Value::from("3.9"));
}

#[test]
fn lists_concatenate_in_order() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.yml", "include:\n  - one\n  - two\n");
    write_file(&dir, "b.yml", "include:\n  - three\n");

    let merged = load_merged(&["a.yml".to_string(), "b.yml".to_string()], dir.path());
    let include: Vec<String> = get(&merged, "include")
        .as_sequence()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(include, vec!["one", "two", "three"]);
}

#[test]
fn mappings_union_shallowly() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "a.yml",
        "services:\n  web:\n    image: nginx\n    ports:\n      - \"80:80\"\n  db:\n    image: postgres\n",
    );
    write_file(
        &dir,
        "b.yml",
        "services:\n  web:\n    image: httpd\n  cache:\n    image: redis\n",
    );

    let merged = load_merged(&["a.yml".to_string(), "b.yml".to_string()], dir.path());
    let services = get(&merged, "services").as_mapping().unwrap();

    // new sub-keys retained from both files
    assert!(services.contains_key(&Value::from("db")));
    assert!(services.contains_key(&Value::from("cache")));

    // overlapping sub-keys are overwritten wholesale, not merged deeper:
    // web from b.yml has no ports
    let web = services.get(&Value::from("web")).unwrap().as_mapping().unwrap();
    assert_eq!(web.get(&Value::from("image")).unwrap(), &Value::from("httpd"));
    assert!(!web.contains_key(&Value::from("ports")));
}

#[test]
fn unparsable_file_contributes_nothing() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.yml", "services:\n  web:\n    image: nginx\n");
    write_file(&dir, "broken.yml", "services: [unclosed\n");
    write_file(&dir, "c.yml", "services:\n  db:\n    image: postgres\n");

    for order in [
        ["broken.yml", "a.yml", "c.yml"],
        ["a.yml", "broken.yml", "c.yml"],
        ["a.yml", "c.yml", "broken.yml"],
    ] {
        let names: Vec<String> = order.iter().map(|s| s.to_string()).collect();
        let merged = load_merged(&names, dir.path());
        let services = get(&merged, "services").as_mapping().unwrap();
        assert!(services.contains_key(&Value::from("web")), "order {order:?}");
        assert!(services.contains_key(&Value::from("db")), "order {order:?}");
    }
}

#[test]
fn missing_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.yml", "services:\n  web:\n    image: nginx\n");

    let merged = load_merged(
        &["nope.yml".to_string(), "a.yml".to_string()],
        dir.path(),
    );
    let services = get(&merged, "services").as_mapping().unwrap();
    assert!(services.contains_key(&Value::from("web")));
}

#[test]
fn all_files_failing_yields_empty_mapping() {
    let dir = TempDir::new().unwrap();
    let merged = load_merged(&["nope.yml".to_string()], dir.path());
    assert!(merged.is_empty());
}
