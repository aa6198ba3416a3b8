//! LLM prompt engineering for field extraction
//!
//! The model's output format is not enforced by the API, so the prompt is the
//! only place the completeness and format rules can be stated.

/// Builds the extraction prompt for one document
pub struct PromptBuilder<'a> {
    text: &'a str,
    doctype: &'a str,
    keys: &'a [String],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    ///
    /// `keys` should be non-empty; the batch driver skips documents without
    /// labels before getting here.
    pub fn new(text: &'a str, doctype: &'a str, keys: &'a [String]) -> Self {
        Self { text, doctype, keys }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task and target fields
        prompt.push_str(ROLE_INSTRUCTION);
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "You will be given OCR text for a document of type: \"{}\".\n",
            self.doctype
        ));
        prompt.push_str(&format!(
            "Extract values for ALL of these fields: {}.\n\n",
            self.keys.join(", ")
        ));

        // 2. Completeness and format rules
        prompt.push_str(EXTRACTION_RULES);
        prompt.push_str("\n\n");

        // 3. Worked example
        prompt.push_str(WORKED_EXAMPLE);
        prompt.push_str("\n\n");

        // 4. The text to extract from, unmodified
        prompt.push_str("OCR TEXT:\n");
        prompt.push_str(self.text);
        prompt.push('\n');

        prompt
    }
}

/// Render the extraction prompt for `text` of type `doctype`
pub fn build_prompt(text: &str, doctype: &str, keys: &[String]) -> String {
    PromptBuilder::new(text, doctype, keys).build()
}

const ROLE_INSTRUCTION: &str = "You are an advanced structured data extraction model.";

const EXTRACTION_RULES: &str = r#"Rules:
1. Include every field exactly as named in the list above.
2. If a value is not present in the text, set it to an empty string "" (never omit the field).
3. If a value is present, copy it exactly as it appears in the text.
4. Return a single valid JSON object containing every field.
5. Do NOT include explanations, markdown or any other text. Output only the JSON object."#;

const WORKED_EXAMPLE: &str = r#"Example:
OCR TEXT:
"This is a Passport of Ali Khan. Date of Birth: 1995-07-21. Passport Number: PK1234567"

Expected JSON:
{
    "name": "Ali Khan",
    "dob": "1995-07-21",
    "passport_number": "PK1234567",
    "nationality": ""
}"#;
