use stratus_plan::{ContainerImage, DeployConfig};

use crate::args::DeployArgs;

pub fn build_config(args: &DeployArgs) -> DeployConfig {
    DeployConfig {
        stage: args.stage.clone().filter(|s| !s.is_empty()),
        region: args.region.clone(),
        partition: args.partition.clone(),
        image: ContainerImage {
            registry_account: Some(args.image_registry_account.clone()).filter(|a| !a.is_empty()),
            repository: args.image_repository.clone(),
            tag: args.image_tag.clone(),
        },
        endpoint_config_base_name: args.endpoint_config_base_name.clone(),
        endpoint_base_name: args.endpoint_base_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::args::Args;

    #[test]
    fn test_defaults_match_deploy_config() {
        let args = Args::try_parse_from(["stratus", "models"]).unwrap();
        assert_eq!(build_config(&args.deploy), DeployConfig::default());
    }

    #[test]
    fn test_empty_stage_and_account() {
        let args = Args::try_parse_from([
            "stratus",
            "--stage",
            "",
            "--image-registry-account",
            "",
            "models",
        ])
        .unwrap();
        let cfg = build_config(&args.deploy);
        assert_eq!(cfg.stage, None);
        assert_eq!(cfg.image.registry_account, None);
    }

    #[test]
    fn test_stage_flag() {
        let args = Args::try_parse_from(["stratus", "--stage", "dev", "plan"]).unwrap();
        assert_eq!(build_config(&args.deploy).stage.as_deref(), Some("dev"));
    }
}
