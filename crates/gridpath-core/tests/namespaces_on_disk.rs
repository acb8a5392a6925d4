use std::fs;
use std::path::Path;

use eyre::Result;
use gridpath_core::config::GridConfig;
use gridpath_core::{
    DirectoryCatalog, ExistenceState, LocalNamespace, Namespaces, OperationKind, PathClassifier,
    PathKind, PathSet, Resolver,
};

struct Fixture {
    _tmp: tempfile::TempDir,
    work: std::path::PathBuf,
    grid: std::path::PathBuf,
    config: GridConfig,
}

fn fixture() -> Result<Fixture> {
    let tmp = tempfile::tempdir()?;
    let work = tmp.path().join("work");
    let grid = tmp.path().join("grid");
    fs::create_dir_all(work.join("src/nested"))?;
    fs::write(work.join("src/nested/data.bin"), b"payload")?;
    fs::write(work.join("notes.txt"), b"notes")?;
    fs::create_dir_all(grid.join("home/rods/dest"))?;
    fs::write(grid.join("home/rods/obj"), b"0123456789")?;

    let mut config = GridConfig::parse("home = \"/z/home/rods\"")?;
    config.insert_zone("z", grid.clone());
    Ok(Fixture {
        _tmp: tmp,
        work,
        grid,
        config,
    })
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[tokio::test]
async fn put_directory_into_catalog_zone() -> Result<()> {
    let fx = fixture()?;
    let local = LocalNamespace::new();
    let catalog = DirectoryCatalog::from_config(&fx.config);
    let classifier = PathClassifier::from_config(&fx.config, &fx.work);
    let resolver = Resolver::new(Namespaces::new(&local, &catalog), classifier);

    let mut set = PathSet::from_args(&["src", "~/dest"])?;
    resolver.resolve(&mut set, OperationKind::Put).await?;

    let target = set.target(0).expect("target");
    assert_eq!(target.resolved_path, "/z/home/rods/dest/src");
    assert_eq!(target.kind, PathKind::Container);
    assert!(is_dir(&fx.grid.join("home/rods/dest/src")));
    assert!(!fx.grid.join("home/rods/dest/src/nested").exists());

    let source = set.source(0).expect("source");
    assert_eq!(source.kind, PathKind::LocalDirectory);
    assert!(!source.object_id.is_empty() || cfg!(not(unix)));
    Ok(())
}

#[tokio::test]
async fn get_several_objects_into_new_local_directory() -> Result<()> {
    let fx = fixture()?;
    fs::write(fx.grid.join("home/rods/second"), b"2")?;
    let local = LocalNamespace::new();
    let catalog = DirectoryCatalog::from_config(&fx.config);
    let classifier = PathClassifier::from_config(&fx.config, &fx.work);
    let resolver = Resolver::new(Namespaces::new(&local, &catalog), classifier);

    let mut set = PathSet::from_args(&["obj", "second", "downloads"])?;
    resolver.resolve(&mut set, OperationKind::Get).await?;

    assert!(is_dir(&fx.work.join("downloads")));
    let first = set.source(0).expect("source");
    assert_eq!(first.kind, PathKind::Object);
    assert_eq!(first.size, 10);
    let target = set.target(0).expect("target");
    assert_eq!(target.kind, PathKind::LocalFile);
    assert_eq!(target.state, ExistenceState::NotExist);
    assert!(target.resolved_path.ends_with("/work/downloads/obj"));
    Ok(())
}

#[tokio::test]
async fn synchronize_mirrors_directory_onto_missing_collection() -> Result<()> {
    let fx = fixture()?;
    let local = LocalNamespace::new();
    let catalog = DirectoryCatalog::from_config(&fx.config);
    let classifier = PathClassifier::from_config(&fx.config, &fx.work);
    let resolver = Resolver::new(Namespaces::new(&local, &catalog), classifier);

    let mut set = PathSet::from_args(&["src", "i:/z/home/rods/mirror"])?;
    let planned = resolver.plan(&mut set, OperationKind::Synchronize).await?;
    assert_eq!(planned.len(), 1);
    assert!(!fx.grid.join("home/rods/mirror").exists());

    resolver.resolve(&mut set, OperationKind::Synchronize).await?;
    assert_eq!(
        set.target(0).expect("target").resolved_path,
        "/z/home/rods/mirror"
    );
    assert!(is_dir(&fx.grid.join("home/rods/mirror")));
    Ok(())
}

#[tokio::test]
async fn unknown_zone_is_a_missing_destination() -> Result<()> {
    let fx = fixture()?;
    let local = LocalNamespace::new();
    let catalog = DirectoryCatalog::from_config(&fx.config);
    let classifier = PathClassifier::from_config(&fx.config, &fx.work);
    let resolver = Resolver::new(Namespaces::new(&local, &catalog), classifier);

    let mut set = PathSet::from_args(&["notes.txt", "/elsewhere/coll/x"])?;
    let err = resolver
        .resolve(&mut set, OperationKind::Put)
        .await
        .expect_err("zone not configured");
    assert!(err.is_missing_destination());
    Ok(())
}
