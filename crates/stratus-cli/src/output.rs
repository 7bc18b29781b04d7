use stratus_common::ModelRecord;
use stratus_plan::DeploymentPlan;
use stratus_provision::{CreateOutcome, ProvisionReport};

pub fn print_models(models: &[ModelRecord]) {
    println!("\n=== Model Table ===\n");
    if models.is_empty() {
        println!("No models defined.");
        return;
    }
    println!(
        "{:<20} {:<12} {:<16} {:<45} {:<10}",
        "Name", "Template", "Instance", "HF Model ID", "Weights"
    );
    println!("{:-<105}", "");
    for m in models {
        println!(
            "{:<20} {:<12} {:<16} {:<45} {:<10}",
            m.name,
            m.prompt_template_name,
            m.instance_type,
            m.hf_model_id().unwrap_or("N/A"),
            if m.model_data.is_some() { "packaged" } else { "hub" }
        );
    }
    println!();
}

pub fn print_plan(plan: &DeploymentPlan) {
    println!("\n=== Deployment Plan ===\n");
    println!("  Endpoint:        {}", plan.identity.endpoint_name);
    println!("  Endpoint config: {}", plan.identity.endpoint_config_name);
    println!("  Deploy suffix:   {}", plan.identity.deploy_suffix);

    println!("\n[Models]");
    println!("  {:<35} {:<16} {:<40}", "Resource", "Instance", "Weights");
    for m in &plan.models {
        let weights = m
            .container
            .model_data
            .as_ref()
            .map(|d| d.uri())
            .unwrap_or_else(|| "N/A".to_string());
        println!("  {:<35} {:<16} {:<40}", m.model_name, m.instance_type, weights);
        for p in &m.role_policy {
            println!("    grant {} on {}", p.actions.join(","), p.resources.join(" "));
        }
    }
    if let Some(m) = plan.models.first() {
        println!("\n  Image: {}", m.container.image);
    }

    println!("\n[Variants]");
    println!("  {:<20} {:<35} {:<8} {:<8}", "Variant", "Model", "Weight", "Count");
    for v in &plan.endpoint_config.variants {
        println!(
            "  {:<20} {:<35} {:<8} {:<8}",
            v.variant_name, v.model_name, v.initial_variant_weight, v.initial_instance_count
        );
    }

    println!("\n[Creation order]");
    match plan.creation_order() {
        Ok(order) => {
            for (i, r) in order.iter().enumerate() {
                println!("  {}. {}", i + 1, r);
            }
        }
        Err(e) => println!("  ✗ {e}"),
    }
    println!();
}

pub fn print_report(report: &ProvisionReport) {
    println!("\n=== Provisioned ===\n");
    for c in &report.created {
        let verb = match c.outcome {
            CreateOutcome::Created => "created",
            CreateOutcome::Updated => "updated",
        };
        println!("  ✓ {} {} ({})", verb, c.resource, c.arn);
    }
    println!(
        "\nEndpoint '{}' now serves config '{}'",
        report.endpoint_name, report.endpoint_config_name
    );
    println!();
}
