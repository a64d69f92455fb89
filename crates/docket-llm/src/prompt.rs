//! LLM prompt engineering for field extraction

use docket_domain::FieldSet;

/// Builds prompts asking the model for a flat JSON object of field values
pub struct PromptBuilder {
    text: String,
    fields: Vec<String>,
    file_name: Option<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: String, fields: &FieldSet) -> Self {
        Self {
            text,
            fields: fields.names().to_vec(),
            file_name: None,
        }
    }

    /// Mention the source file name in the prompt
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Fields to extract (use these exact keys):\n");
        for field in &self.fields {
            prompt.push_str(&format!("- {}\n", field));
        }
        prompt.push('\n');

        if let Some(file_name) = &self.file_name {
            prompt.push_str(&format!("Source file: {}\n\n", file_name));
        }

        prompt.push_str("Document:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a document data extraction assistant. Read the document below and extract the requested fields.

Rules:
1. Return exactly one JSON object whose keys are the requested field names, spelled exactly as given.
2. Copy values as they appear in the document. Do not reformat dates or currency.
3. Use a JSON number only when the document shows a plain number; otherwise use a string.
4. If a field cannot be found, set it to null. Never omit a requested key.
5. Do not invent values."#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Respond with the JSON object only, no commentary and no code fences.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_fields_in_order() {
        let fields = FieldSet::from_names(["Customer", "Job No", "Grand Total"]);
        let prompt = PromptBuilder::new("Invoice text".to_string(), &fields).build();

        let customer = prompt.find("- Customer").unwrap();
        let job = prompt.find("- Job No").unwrap();
        let total = prompt.find("- Grand Total").unwrap();
        assert!(customer < job && job < total);
    }

    #[test]
    fn test_prompt_contains_document_and_reminder() {
        let fields = FieldSet::from_names(["Customer"]);
        let prompt = PromptBuilder::new("Bill to: Acme".to_string(), &fields).build();

        assert!(prompt.contains("Bill to: Acme"));
        assert!(prompt.contains("JSON object only"));
        assert!(!prompt.contains("Source file"));
    }

    #[test]
    fn test_prompt_with_file_name() {
        let fields = FieldSet::from_names(["Customer"]);
        let prompt = PromptBuilder::new("x".to_string(), &fields)
            .with_file_name("invoice-7.pdf")
            .build();

        assert!(prompt.contains("Source file: invoice-7.pdf"));
    }
}
