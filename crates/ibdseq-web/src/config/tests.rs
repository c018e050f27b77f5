#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.data.seed, 42);
        assert!(config.data.dataset_path.is_none());
        assert_eq!(config.scoring.reference_model, "human_uc");
        assert_eq!(config.scoring.similarity, SimilarityWeights::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 8080

            [scoring]
            reference_model = "human_cd"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.scoring.reference_model, "human_cd");
        assert_eq!(config.scoring.targets, TargetWeights::default());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let res = Config::from_toml_str(
            r#"
            [scoring.similarity]
            gene_expression_correlation = 0.5
            pathway_overlap = 0.5
            de_gene_overlap = 0.5
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_reference_model_checked_against_catalog() {
        let mut config = Config::default();
        assert!(config.validate_against(&Catalog::default()).is_ok());
        config.scoring.reference_model = "rat_tnbs".to_string();
        assert!(config.validate_against(&Catalog::default()).is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ibdseq.toml");
        std::fs::write(&path, "[data]\nseed = 7\nstatic_dir = \"site\"\n").unwrap();
        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.data.seed, 7);
        assert_eq!(config.data.static_dir, "site");
    }
}
