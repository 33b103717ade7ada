//! System prompts for the three completion calls of the transcribe pipeline.

pub const ANONYMIZE_TITLE: &str = "You rewrite YouTube video titles so they no longer identify anyone. \
Replace names of people, channels, companies, places and any other identifying detail with neutral, \
generic wording while keeping the topic of the title. Keep the original language. \
Reply with the rewritten title only, without quotes or commentary.";

pub const ANONYMIZE_TRANSCRIPT: &str = "You anonymize video transcripts. Remove or replace every \
personal name, username, channel name, company, brand, address, phone number, e-mail, URL and any \
other detail that could identify the speaker or third parties. Use neutral placeholders such as \
\"the speaker\" or \"a company\". Do not summarize, translate or omit content otherwise; keep the \
original language, order and meaning. Fix obvious punctuation. Reply with the anonymized text only.";

/// Transcript anonymization runs cooler than the other calls.
pub const ANONYMIZE_TRANSCRIPT_TEMPERATURE: f32 = 0.2;

pub const TRANSCRIPT_TO_HTML: &str = "You turn a plain-text transcript into a readable HTML article \
fragment. Split it into paragraphs with <p>, add <h2> section headings where the topic changes, and \
use <ul>/<li> for enumerations. Do not add <html>, <head>, <body>, styles or scripts. Keep the \
original language and wording. Reply with the HTML fragment only, without Markdown code fences.";
