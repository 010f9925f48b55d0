//! Integration tests for Stratum
//!
//! Drives the public API end-to-end against real temporary directories:
//! a dependency contribution with a stubbed artifact cache, a helper
//! contribution from a local file, and the reuse cycle across invocations.

mod contribution_tests {
    use std::fs::{self, File};
    use std::io::Read;
    use std::path::PathBuf;

    use stratum::dependency::{BuildpackDependency, BuildpackLicense, DependencyCache};
    use stratum::layer::{
        DependencyLayerContributor, HelperInfo, HelperLayerContributor, Layer,
    };
    use stratum::plan::BuildPlan;
    use stratum::ui::Logger;
    use stratum::{BoxedError, StratumError};
    use tempfile::TempDir;

    /// Honor RUST_LOG so the engine's debug events are visible in test runs
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    struct FileCache {
        artifact: PathBuf,
    }

    impl DependencyCache for FileCache {
        fn artifact(&self, _dependency: &BuildpackDependency) -> Result<File, BoxedError> {
            File::open(&self.artifact).map_err(Into::into)
        }
    }

    fn node_dependency() -> BuildpackDependency {
        BuildpackDependency {
            id: "node".to_string(),
            name: "Node.js".to_string(),
            version: "14.0.0".to_string(),
            uri: "https://example.com/node-14.0.0.tgz".to_string(),
            sha256: "abc123def456".to_string(),
            stacks: vec!["io.buildpacks.stacks.bionic".to_string()],
            licenses: vec![BuildpackLicense {
                license_type: "MIT".to_string(),
                uri: "https://opensource.org/licenses/MIT".to_string(),
            }],
        }
    }

    fn cache_for(temp: &TempDir) -> FileCache {
        let artifact = temp.path().join("downloads").join("node-14.0.0.tgz");
        fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        fs::write(&artifact, "node-archive").unwrap();
        FileCache { artifact }
    }

    #[test]
    fn dependency_contribution_then_reuse() {
        init_tracing();
        let temp = TempDir::new().unwrap();
        let layer_path = temp.path().join("layers").join("node");
        let mut plan = BuildPlan::new();

        // First build: miss, artifact installed, metadata recorded
        let mut contributor = DependencyLayerContributor::new(
            node_dependency(),
            cache_for(&temp),
            Layer::new(&layer_path),
            &mut plan,
        )
        .with_logger(Logger::silent());

        let built = contributor
            .contribute(|mut artifact, layer| {
                let mut bytes = Vec::new();
                artifact.read_to_end(&mut bytes).unwrap();
                fs::write(layer.path.join("node.tgz"), bytes).unwrap();
                Ok(layer)
            })
            .unwrap();

        assert!(built.path.join("node.tgz").exists());
        assert_eq!(built.metadata["id"].as_str(), Some("node"));
        assert_eq!(built.metadata["version"].as_str(), Some("14.0.0"));
        let licenses = built.metadata["licenses"].as_array().unwrap();
        assert_eq!(licenses[0]["type"].as_str(), Some("MIT"));
        assert_eq!(plan.entries.len(), 1);

        // Second build, as the host pipeline would run it: the persisted
        // layer comes back in, and the contribution is a pure cache hit.
        let mut plan = BuildPlan::new();
        let mut contributor = DependencyLayerContributor::new(
            node_dependency(),
            cache_for(&temp),
            built.clone(),
            &mut plan,
        )
        .with_logger(Logger::silent());

        let reused = contributor
            .contribute(|_, _| panic!("cache hit expected, build must not run"))
            .unwrap();

        assert_eq!(reused, built);
        assert!(reused.path.join("node.tgz").exists());
        // Provenance is still recorded on the hit
        assert_eq!(plan.entries.len(), 1);
    }

    #[test]
    fn version_bump_rebuilds_from_scratch() {
        init_tracing();
        let temp = TempDir::new().unwrap();
        let layer_path = temp.path().join("layers").join("node");
        let mut plan = BuildPlan::new();

        let mut contributor = DependencyLayerContributor::new(
            node_dependency(),
            cache_for(&temp),
            Layer::new(&layer_path),
            &mut plan,
        )
        .with_logger(Logger::silent());

        let built = contributor
            .contribute(|_, layer| {
                fs::write(layer.path.join("node.tgz"), "old-archive").unwrap();
                Ok(layer)
            })
            .unwrap();

        let mut bumped = node_dependency();
        bumped.version = "16.0.0".to_string();

        let mut contributor =
            DependencyLayerContributor::new(bumped, cache_for(&temp), built, &mut plan)
                .with_logger(Logger::silent());

        let rebuilt = contributor
            .contribute(|_, layer| {
                // The old content must already be gone
                assert!(!layer.path.join("node.tgz").exists());
                fs::write(layer.path.join("node-16.tgz"), "new-archive").unwrap();
                Ok(layer)
            })
            .unwrap();

        assert!(rebuilt.path.join("node-16.tgz").exists());
        assert_eq!(rebuilt.metadata["version"].as_str(), Some("16.0.0"));
    }

    #[test]
    fn helper_contribution_then_reuse() {
        init_tracing();
        let temp = TempDir::new().unwrap();
        let helper = temp.path().join("bin").join("exec-helper");
        fs::create_dir_all(helper.parent().unwrap()).unwrap();
        fs::write(&helper, "#!/bin/sh\nexec true\n").unwrap();

        let info = HelperInfo {
            id: "example/buildpack".to_string(),
            name: "Example Buildpack".to_string(),
            version: "1.2.3".to_string(),
            clear_environment: false,
        };

        let mut plan = BuildPlan::new();
        let mut contributor = HelperLayerContributor::new(
            &helper,
            "exec-helper",
            &info,
            Layer::new(temp.path().join("layers").join("helper")),
            &mut plan,
        )
        .with_logger(Logger::silent());

        let built = contributor
            .contribute(|mut artifact, layer| {
                let mut script = String::new();
                artifact.read_to_string(&mut script).unwrap();
                fs::write(layer.path.join("exec-helper"), script).unwrap();
                Ok(layer)
            })
            .unwrap();

        assert_eq!(plan.entries[0].name, "exec-helper");
        assert_eq!(built.metadata["clear-env"].as_bool(), Some(false));

        let mut plan = BuildPlan::new();
        let mut contributor = HelperLayerContributor::new(
            &helper,
            "exec-helper",
            &info,
            built.clone(),
            &mut plan,
        )
        .with_logger(Logger::silent());

        let reused = contributor
            .contribute(|_, _| panic!("cache hit expected, build must not run"))
            .unwrap();
        assert_eq!(reused, built);
    }

    #[test]
    fn failing_build_keeps_missing_until_it_succeeds() {
        init_tracing();
        let temp = TempDir::new().unwrap();
        let layer_path = temp.path().join("layers").join("jdk");
        let mut plan = BuildPlan::new();

        let mut dependency = node_dependency();
        dependency.id = "jdk".to_string();
        dependency.name = "BellSoft Liberica JDK".to_string();
        dependency.version = "11.0.1".to_string();

        let mut contributor = DependencyLayerContributor::new(
            dependency,
            cache_for(&temp),
            Layer::new(&layer_path),
            &mut plan,
        )
        .with_logger(Logger::silent());

        // Two successive failing builds: both must be misses
        for _ in 0..2 {
            let err = contributor
                .contribute(|_, _| Err(StratumError::build("unpack failed")))
                .unwrap_err();
            assert_eq!(err.to_string(), "unpack failed");
        }

        // Third attempt succeeds and finally records the metadata
        let built = contributor
            .contribute(|_, layer| {
                fs::write(layer.path.join("release"), "JAVA_VERSION=11.0.1").unwrap();
                Ok(layer)
            })
            .unwrap();
        assert_eq!(built.metadata["id"].as_str(), Some("jdk"));
    }
}
