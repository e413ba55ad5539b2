//! Prompt builders for every oracle call the agent makes.
//!
//! Each builder fills a fixed template. The wording is tuned for small local
//! models: the classification prompts end with an explicit one-word answer
//! format, and the decision prompt pins the `Thought:`/`Action:` layout that
//! [`super::response_parser::parse_decision`] reads.

use crate::domain::models::Fragment;

/// Separator between fragments in an answer context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Strict binary relevance question for one fragment.
pub fn relevance_prompt(query: &str, fragment: &str) -> String {
    format!(
        "You are a STRICT legal relevance evaluator.

TASK:
Decide whether the given legal chunk is DIRECTLY useful to answer the query.

RULES:
- Accept ONLY if chunk contains legal meaning related to the query.
- Accept if synonyms or different legal wording express same meaning.
- Reject if chunk is general, unrelated, procedural, or weakly related.
- Reject if chunk does not help answer the query directly.
- Be strict. Do NOT guess.

Query:
{query}

Chunk:
{fragment}

Answer ONLY in one word:
YES or NO
"
    )
}

/// Thought/action request carrying the full reasoning trace.
pub fn decision_prompt(query: &str, reasoning_trace: &str) -> String {
    format!(
        "You are an autonomous Legal ReAct Agent.

Question:
{query}

Previous reasoning:
{reasoning_trace}

Decide next action:

- retrieve: search legal database for evidence
- answer: produce final grounded legal answer

Reply EXACTLY in format:

Thought: <your reasoning>
Action: <retrieve OR answer>
"
    )
}

/// Joins selected fragments into one context block, in order.
pub fn context_block(fragments: &[Fragment]) -> String {
    fragments.join(CONTEXT_SEPARATOR)
}

/// Grounded answer request constrained to the given context.
pub fn answer_prompt(query: &str, context: &str) -> String {
    format!(
        "You are a precise Legal AI Assistant.

Use ONLY the provided legal context to answer the query.
Do NOT hallucinate.
If answer not fully available, answer using best possible legal interpretation from context.

Legal Context:
{context}

Query:
{query}

Give clear, legally correct, concise answer.
Answer Clearly in points.
"
    )
}

/// Judge question: does the actual answer agree with the expected one?
pub fn judge_prompt(query: &str, expected: &str, actual: &str) -> String {
    format!(
        "You are a STRICT evaluator of legal answers.

TASK:
Decide whether the actual answer conveys the same legal substance as the
expected answer for the question. Wording may differ. Missing key
conditions, added contradictions or an answer that declines to answer
count as disagreement.

Question:
{query}

Expected answer:
{expected}

Actual answer:
{actual}

Answer ONLY in one word:
YES or NO
"
    )
}

/// Faithfulness question: is every claim in the answer backed by the
/// retrieved context alone?
pub fn faithfulness_prompt(query: &str, context: &str, answer: &str) -> String {
    format!(
        "You are a STRICT checker of grounded legal answers.

TASK:
Decide whether every legal claim in the answer is supported by the
retrieved context below. Outside legal knowledge does not count as
support. A claim the context does not state makes the answer unfaithful.

Question:
{query}

Retrieved context:
{context}

Answer:
{answer}

Answer ONLY in one word:
YES or NO
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_block_joins_with_blank_line() {
        let fragments = vec!["Section 5".to_string(), "Section 7".to_string()];
        assert_eq!(context_block(&fragments), "Section 5\n\nSection 7");
        assert_eq!(context_block(&[]), "");
    }

    #[test]
    fn test_prompts_embed_inputs() {
        let relevance = relevance_prompt("valid marriage?", "Section 5: Conditions");
        assert!(relevance.contains("valid marriage?"));
        assert!(relevance.contains("Section 5: Conditions"));
        assert!(relevance.trim_end().ends_with("YES or NO"));

        let decision = decision_prompt("valid marriage?", "\nThought: look\nAction: retrieve\n");
        assert!(decision.contains("Action: retrieve"));
        assert!(decision.contains("Action: <retrieve OR answer>"));

        let answer = answer_prompt("valid marriage?", "Section 5\n\nSection 7");
        assert!(answer.contains("Legal Context:\nSection 5\n\nSection 7"));

        let faithfulness = faithfulness_prompt("valid marriage?", "Section 5", "1. No spouse.");
        assert!(faithfulness.contains("Retrieved context:\nSection 5"));
        assert!(faithfulness.contains("1. No spouse."));
        assert!(!faithfulness.contains("Expected answer:"));
        assert!(!judge_prompt("q", "e", "a").contains("Retrieved context:"));
    }
}
