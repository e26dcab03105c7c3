pub fn user_cluster_summary(descriptions: &str) -> String {
    format!(
        r#"As a learning path advisor, analyze these image descriptions and create a comprehensive summary of the learning interests and potential career path. Include:

1. Main areas of interest
2. Suggested learning path
3. Potential career opportunities
4. Key skills to develop

Keep the summary concise but informative.

Image Descriptions:
{descriptions}"#,
        descriptions = descriptions
    )
}
