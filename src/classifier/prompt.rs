//! Classification prompt construction.

/// Instructions sent ahead of the numbered title list.
const INSTRUCTIONS: &str = "You are a productivity assistant. Classify these website titles as 'Productive' or 'Distracting'. \
If you are unsure, default to 'Productive' if it looks work-related (docs, email, tools) and 'Distracting' for entertainment/social media. \
It is productive if the site is related to learning even if it is on a video or social platform. \
But the same platform is a distraction when the content is not related to learning. \
Return a JSON object where keys are the titles exactly as listed and values are the classification.";

/// Trailer asking for bare JSON.
const OUTPUT_RULES: &str =
    "Output JSON only, with no explanation and no markdown code fences.";

/// Build the single batched prompt for a list of distinct titles.
///
/// Titles are numbered from 1 in the order given; the same order is used to
/// look results up again.
pub fn build_prompt(titles: &[String]) -> String {
    let list = titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. {}", i + 1, title))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\nList:\n{}\n\n{}", INSTRUCTIONS, list, OUTPUT_RULES)
}
