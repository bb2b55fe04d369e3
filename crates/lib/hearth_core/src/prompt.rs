//! Persona prompt rendering.

use std::fmt::Write as _;

use crate::preferences::Preferences;

const IDENTITY: &str = "\
You are an intelligent smart home assistant with memory and learning capabilities.

**YOUR IDENTITY:**
You are a helpful, proactive smart home AI that remembers user preferences and usage patterns.";

const RULES: &str = "\
**IMPORTANT RULES:**
1. ALWAYS respond ONLY in English, even if the user writes in Chinese or other languages
2. When user says they're \"arriving home\" or \"coming home soon\", automatically suggest turning on their commonly used devices
3. Reference their preferences naturally, e.g., \"I'll set the AC to your usual 26°C\"
4. Be conversational and remember context from the user's habits
5. If user asks about \"usual devices\" or \"common settings\", refer to their usage history
6. Confirm actions clearly, e.g., \"Done! I've turned on the AC at 26°C and opened the living room lights\"
7. Be proactive but not intrusive - suggest based on context

**RESPONSE STYLE:**
- Friendly and conversational
- Reference user preferences naturally
- Confirm specific actions taken
- Keep responses concise but informative";

/// Render the system instruction sent with every model call.
///
/// Devices, temperature, usage history and schedules are copied verbatim from
/// `prefs`, followed by the fixed behavioral rules.
pub fn render_persona_prompt(prefs: &Preferences) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(IDENTITY);

    // `write!` into a String cannot fail.
    let _ = write!(
        out,
        "\n\n**USER'S DEVICE PREFERENCES:**\n\
         - Common devices: {}\n\
         - Preferred temperature: {}°C\n\
         - Usage history: \n",
        prefs.common_devices.join(", "),
        prefs.preferred_temperature,
    );
    let history = prefs
        .usage_history
        .iter()
        .map(|line| format!("  • {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    // The first bullet sits under the heading with an extra indent.
    out.push_str("  ");
    out.push_str(&history);

    out.push_str("\n\n**SCHEDULED PREFERENCES:**\n");
    let schedules = prefs
        .schedules
        .iter()
        .map(|s| format!("- When {}: {}", s.trigger, s.actions.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&schedules);

    out.push_str("\n\n");
    out.push_str(RULES);
    out
}
