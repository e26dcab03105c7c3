use crate::models::{ClusterReport, ClusterSummary};

pub fn render_report(clusters: &[ClusterSummary], reports: &[ClusterReport]) -> String {
    let mut md = String::new();
    md.push_str("# Learning Path Clusters\n\n");

    for cluster in clusters {
        md.push_str(&format!("## Cluster {}\n\n", cluster.cluster_id));

        if cluster.users.is_empty() {
            md.push_str("_No members._\n\n");
            continue;
        }

        md.push_str(&format!("- Members: {}\n", cluster.users.join(", ")));
        if !cluster.common_themes.is_empty() {
            md.push_str(&format!(
                "- Common themes: {}\n",
                cluster.common_themes.join(", ")
            ));
        }
        if !cluster.domains.is_empty() {
            md.push_str(&format!("- Domains: {}\n", cluster.domains.join(", ")));
        }
        md.push_str(&format!(
            "- Similarity score: {:.3}\n",
            cluster.similarity_score
        ));

        if let Some(report) = reports.iter().find(|r| r.cluster_id == cluster.cluster_id) {
            if let Some(summary) = &report.summary {
                md.push_str(&format!("\n{}\n", summary.trim()));
            }
            if let Some(error) = &report.error {
                md.push_str(&format!("\n_Summary unavailable: {}_\n", error));
            }
        }

        md.push('\n');
    }

    md
}
