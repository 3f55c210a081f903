//! Starter questions and state selection for the chat session

use super::types::StatesResponse;

const EXAMPLE_QUESTIONS: &[(&str, [&str; 2])] = &[
    ("GA", ["What is Georgia's state sales tax rate?", "Are groceries taxable in Georgia?"]),
    ("TX", ["What is Texas sales tax nexus threshold?", "Are digital products taxable in Texas?"]),
    ("NV", ["What are Nevada's sales tax exemptions?", "Is manufacturing equipment exempt in Nevada?"]),
    ("SD", ["Is SaaS taxable in South Dakota?", "What is South Dakota's economic nexus threshold?"]),
    ("NY", ["What is the clothing exemption threshold in NY?", "How does NYC sales tax differ from upstate?"]),
    ("CA", ["What are California district tax rates?", "How do I calculate use tax in California?"]),
    ("NJ", ["Are groceries taxable in New Jersey?", "What is NJ's sales tax rate on clothing?"]),
    ("IL", ["What are Illinois marketplace facilitator rules?", "Are services taxable in Illinois?"]),
    ("ND", ["Are agricultural supplies exempt in North Dakota?", "What is ND's sales tax rate?"]),
    ("VA", ["Are digital goods taxable in Virginia?", "What is Virginia's sales tax rate?"]),
    ("PA", ["Is clothing exempt from PA sales tax?", "What is Pennsylvania's sales tax rate?"]),
    ("NC", ["Are groceries taxable in North Carolina?", "What is NC's state sales tax rate?"]),
    ("CO", ["How do home rule cities work in Colorado?", "What is Colorado's state sales tax rate?"]),
    ("FL", ["When are Florida's tax-free holidays?", "Are groceries taxable in Florida?"]),
    ("NE", ["Are services taxable in Nebraska?", "What is Nebraska's sales tax rate?"]),
    ("MN", ["Is clothing taxable in Minnesota?", "What are MN's exemptions for manufacturing?"]),
    ("AL", ["What is Alabama's combined state and local rate?", "Are groceries taxable in Alabama?"]),
    ("CT", ["What is Connecticut's sales tax rate?", "Are luxury items taxed differently in CT?"]),
    ("WY", ["What is Wyoming's sales tax rate?", "Are services taxable in Wyoming?"]),
    ("AK", ["Does Alaska have state sales tax?", "Which Alaska cities have local sales tax?"]),
    ("OR", ["Does Oregon have sales tax?", "Are there any transaction taxes in Oregon?"]),
    ("MA", ["What is Massachusetts sales tax on meals?", "Are clothing items under $175 exempt?"]),
];

/// Shown when the backend has no researched states
pub const EMPTY_KNOWLEDGE_BASE: &str =
    "The knowledge base is empty. Run the research agent to populate it.";

/// Suggested questions for a state; empty for states without suggestions
pub fn example_questions(state_code: &str) -> &'static [&'static str] {
    EXAMPLE_QUESTIONS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(state_code))
        .map_or(&[], |(_, questions)| questions.as_slice())
}

/// New York when it has been researched, otherwise the first state listed
pub fn default_state(states: &StatesResponse) -> Option<&str> {
    states
        .states
        .iter()
        .find(|s| s.code == "NY")
        .or_else(|| states.states.first())
        .map(|s| s.code.as_str())
}
