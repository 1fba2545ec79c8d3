//! Stage instructions for live generation and canned replies for demo mode.

use crate::stage::Stage;

pub fn system_instruction(stage: Stage) -> &'static str {
    match stage {
        Stage::Greeting => "You are a professional and friendly AI assistant designed to help collect project requirements from potential clients.
Your goal is to gather essential information about their project in a conversational manner.
Start by welcoming them and asking about their project in a friendly, professional tone.
Keep your responses concise and focused on gathering project details.",
        Stage::CollectingRequirements => "You are a requirements gathering assistant with expertise in software development projects.
Based on the user's previous messages, ask targeted follow-up questions to gather more specific details about:
1. Project type (web, mobile, desktop, etc.)
2. Desired features and functionality
3. Target audience/users
4. Technical requirements or constraints
5. Timeline expectations

Be conversational but focused on getting concrete, actionable project details.
Your questions should be relevant to what they've already shared.
Keep responses concise (2-3 sentences maximum) and end with a specific question.",
        Stage::GeneratingEstimate => "You are an expert project estimator.
Based on the collected requirements, provide a preliminary estimate including timeline and budget range.
Acknowledge that this is just an initial estimate and that a more detailed quote would require further discussion.
Ask if they would like to proceed to share their contact information for a detailed proposal.
Keep your response professional, confident but not overpromising.",
        Stage::CollectingContact => "You are a professional sales assistant.
Thank the user for their interest and explain that you need their contact information to proceed.
Ask for their name, email address, and phone number politely.
Assure them that their information will be handled securely and only used to contact them about their project.
Keep your response friendly, professional and concise.",
        Stage::Confirmation => "You are a helpful assistant wrapping up a conversation.
Thank the user for providing their information and summarize what will happen next.
Let them know that a team member will review their project details and contact them soon.
Ask if there's anything else they'd like to add before concluding.
Keep your response friendly, appreciative and professional.",
    }
}

/// Substituted whenever live generation fails.
pub const FALLBACK_REPLY: &str = "I'm sorry, I encountered an issue processing your request. Let's continue with your project requirements. What else would you like to share?";

/// Returned by `complete`; never generated.
pub const COMPLETION_MESSAGE: &str = "Thank you for your interest! Your information has been submitted successfully. Our team will contact you shortly to discuss your project in detail.";

pub fn canned_reply(stage: Stage, user_input: &str) -> String {
    match stage {
        Stage::Greeting => "Hi there! I'm an AI assistant designed to help collect information about your project. I can help gather requirements, provide a basic estimate, and collect your contact information. Let's start by discussing your project. What is it about?".to_string(),
        Stage::CollectingRequirements => {
            let input = user_input.to_lowercase();
            let follow_up = if input.contains("website") {
                "That sounds interesting! Will your website need any e-commerce features?"
            } else if input.contains("app") || input.contains("application") {
                "Great! Is this a mobile app, web app, or desktop application?"
            } else {
                "Could you elaborate more on the features you need for this project?"
            };
            format!("Thanks for sharing that information. {follow_up}")
        }
        Stage::GeneratingEstimate => "Based on the information you've provided, here's a basic estimate for your project:\n\n- Timeline: 8-12 weeks\n- Budget range: $15,000-$25,000\n\nThis is just a preliminary estimate. Would you like to proceed to share your contact information so we can provide a more detailed quote?".to_string(),
        Stage::CollectingContact => "Great! Could you please provide your name, email address, and phone number so our team can contact you with a detailed proposal?".to_string(),
        Stage::Confirmation => "Thank you for providing all the information! Our team will review your project details and get back to you soon with a comprehensive proposal. Is there anything else you'd like to add before we wrap up?".to_string(),
    }
}
