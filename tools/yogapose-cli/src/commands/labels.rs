//! List the resolved class labels.

use yogapose_common::config::AppConfig;
use yogapose_pose_model::ClassLabelSet;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let labels = ClassLabelSet::load(&config.model.labels_path, &config.model.labels_csv)?;
    println!("{} pose classes:", labels.len());
    for (index, label) in labels.iter().enumerate() {
        println!("  {index:>2}  {label}");
    }
    Ok(())
}
