//! Canned-reply weather assistant.

use rand::seq::IndexedRandom;

use crate::{model::CurrentConditions, presentation::round_temp};

pub const GREETING: &str = "Hey there! 👋 I'm your weather AI assistant. I can help explain weather \
patterns, give you personalized tips, and answer any weather-related questions you have!";

pub const QUICK_QUESTIONS: &[&str] = &[
    "What should I wear today?",
    "Is it good weather for outdoor activities?",
    "Will it rain later?",
    "Explain today's weather",
];

pub const DEFAULT_REPLIES: &[&str] = &[
    "That's interesting! Weather is such a fascinating topic. Did you know that no two snowflakes \
     are exactly alike? ❄️ What specifically about weather interests you?",
    "I love talking about weather! 🌤️ It affects so much of our daily lives. Is there something \
     specific you'd like to know or discuss?",
    "Weather is amazing, right? From tiny raindrops to massive storm systems - there's always \
     something cool happening in our atmosphere! 🌪️ What can I help you with?",
    "Great question! I'm always excited to chat about weather patterns, forecasts, or how weather \
     impacts our daily decisions. What would you like to explore? 🔍",
];

/// Anything that can answer a chat message.
pub trait Responder: Send + Sync {
    fn respond(&self, utterance: &str, current: Option<&CurrentConditions>) -> String;
}

/// Which rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Weather,
    Rain,
    Outfit,
    Activities,
    Greeting,
    Thanks,
}

type Template = fn(Option<&CurrentConditions>) -> String;

struct Rule {
    topic: Topic,
    keywords: &'static [&'static str],
    reply: Template,
}

/// Evaluated top to bottom; the first rule with a keyword contained in the
/// lower-cased utterance wins.
const RULES: &[Rule] = &[
    Rule {
        topic: Topic::Weather,
        keywords: &["weather", "temperature"],
        reply: weather_reply,
    },
    Rule {
        topic: Topic::Rain,
        keywords: &["rain", "umbrella"],
        reply: rain_reply,
    },
    Rule {
        topic: Topic::Outfit,
        keywords: &["outfit", "clothes", "wear"],
        reply: outfit_reply,
    },
    Rule {
        topic: Topic::Activities,
        keywords: &["activities", "plans", "outside"],
        reply: activities_reply,
    },
    Rule {
        topic: Topic::Greeting,
        keywords: &["hello", "hi", "hey"],
        reply: greeting_reply,
    },
    Rule {
        topic: Topic::Thanks,
        keywords: &["thanks", "thank"],
        reply: thanks_reply,
    },
];

const WARM_ABOVE: f64 = 25.0;
const COLD_BELOW: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feel {
    Warm,
    Cold,
    Mild,
}

fn feel(temp: f64) -> Feel {
    if temp > WARM_ABOVE {
        Feel::Warm
    } else if temp < COLD_BELOW {
        Feel::Cold
    } else {
        Feel::Mild
    }
}

fn weather_reply(current: Option<&CurrentConditions>) -> String {
    let Some(c) = current else {
        return "I don't have current weather data right now, but I'm here to help with any \
                weather questions you have!"
            .to_string();
    };
    let tip = match feel(c.temperature) {
        Feel::Warm => "It's pretty warm out there! Stay hydrated and consider light clothing. ☀️",
        Feel::Cold => "It's quite chilly! Make sure to dress warmly and maybe grab a hot drink. 🧥",
        Feel::Mild => "Perfect weather for being outside! Enjoy your day! 🌤️",
    };
    format!(
        "Based on current conditions, it's {}°C and {}. {}",
        round_temp(c.temperature),
        c.description,
        tip
    )
}

fn rain_reply(_: Option<&CurrentConditions>) -> String {
    "Great question about rain! ☔ I always recommend checking the hourly forecast before heading \
     out. If there's a chance of rain, an umbrella or light rain jacket can save your day. Pro \
     tip: Weather can change quickly, so it's better to be prepared!"
        .to_string()
}

fn outfit_reply(current: Option<&CurrentConditions>) -> String {
    let Some(c) = current else {
        return "I'd love to give you outfit advice! Could you tell me what the current temperature \
                is, or share your location so I can help you dress appropriately?"
            .to_string();
    };
    match feel(c.temperature) {
        Feel::Warm => "For this warm weather, I'd suggest light, breathable fabrics like cotton or \
                       linen. Think shorts, t-shirts, and don't forget sunscreen! 👕☀️",
        Feel::Cold => "Bundle up! Layers are your friend - start with a base layer, add a sweater, \
                       and top with a warm coat. Don't forget a hat and gloves! 🧥❄️",
        Feel::Mild => "Perfect temperature for layers! A light jacket or sweater that you can \
                       easily remove if it warms up. Jeans and a comfortable top would work \
                       great! 👍",
    }
    .to_string()
}

fn activities_reply(_: Option<&CurrentConditions>) -> String {
    "Weather can totally make or break outdoor plans! 🌈 For sunny days, hiking, picnics, or \
     sports are perfect. Cloudy but mild? Great for walking or outdoor photography. Rainy? Maybe \
     indoor activities like museums, movies, or cozy cafes. What kind of activities do you enjoy?"
        .to_string()
}

fn greeting_reply(_: Option<&CurrentConditions>) -> String {
    "Hey! 👋 So glad you're here! I'm your personal weather buddy. Whether you need outfit advice, \
     activity suggestions, or just want to understand why the weather is doing what it's doing, \
     I'm here to help! What's on your mind?"
        .to_string()
}

fn thanks_reply(_: Option<&CurrentConditions>) -> String {
    "You're so welcome! 😊 That's what I'm here for! Feel free to ask me anything else about \
     weather, and remember - there's no such thing as bad weather, only inappropriate clothing! 🌦️"
        .to_string()
}

/// Keyword table responder; stateless apart from the default-pool pick.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResponder;

impl KeywordResponder {
    pub fn new() -> Self {
        Self
    }

    /// The rule that would answer `utterance`, if any.
    pub fn classify(&self, utterance: &str) -> Option<Topic> {
        find_rule(utterance).map(|rule| rule.topic)
    }
}

fn find_rule(utterance: &str) -> Option<&'static Rule> {
    let msg = utterance.to_lowercase();
    RULES.iter().find(|rule| rule.keywords.iter().any(|k| msg.contains(k)))
}

impl Responder for KeywordResponder {
    fn respond(&self, utterance: &str, current: Option<&CurrentConditions>) -> String {
        match find_rule(utterance) {
            Some(rule) => (rule.reply)(current),
            None => DEFAULT_REPLIES
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or(DEFAULT_REPLIES[0])
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::baseline_conditions;
    use rstest::rstest;

    fn conditions(temp: f64, description: &str) -> CurrentConditions {
        CurrentConditions {
            temperature: temp,
            description: description.to_string(),
            ..baseline_conditions(0, 0)
        }
    }

    #[test]
    fn outfit_question_in_heat_gets_warm_template() {
        let current = conditions(30.0, "clear sky");
        let reply = KeywordResponder.respond("What should I wear today?", Some(&current));

        assert_eq!(KeywordResponder.classify("What should I wear today?"), Some(Topic::Outfit));
        assert!(reply.contains("light, breathable fabrics"));
        assert!(!DEFAULT_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn hello_is_always_a_greeting() {
        let with = KeywordResponder.respond("hello", Some(&conditions(5.0, "snow")));
        let without = KeywordResponder.respond("hello", None);
        assert_eq!(with, without);
        assert!(with.starts_with("Hey! 👋"));
    }

    #[rstest]
    #[case("Explain today's weather", Topic::Weather)]
    #[case("Is it good weather for outdoor activities?", Topic::Weather)]
    #[case("Will it rain later?", Topic::Rain)]
    #[case("Do I need an UMBRELLA", Topic::Rain)]
    #[case("any plans for the weekend", Topic::Activities)]
    #[case("hey", Topic::Greeting)]
    #[case("thank you", Topic::Thanks)]
    fn precedence_table(#[case] utterance: &str, #[case] expected: Topic) {
        assert_eq!(KeywordResponder.classify(utterance), Some(expected));
    }

    #[test]
    fn weather_reply_interpolates_conditions() {
        let reply = KeywordResponder.respond("temperature?", Some(&conditions(7.6, "light snow")));
        assert!(reply.starts_with("Based on current conditions, it's 8°C and light snow."));
        assert!(reply.contains("quite chilly"));
    }

    #[test]
    fn weather_reply_without_data() {
        let reply = KeywordResponder.respond("weather", None);
        assert!(reply.starts_with("I don't have current weather data"));
    }

    #[test]
    fn mild_and_cold_outfits() {
        let mild = KeywordResponder.respond("outfit", Some(&conditions(18.0, "few clouds")));
        assert!(mild.contains("Perfect temperature for layers"));
        let cold = KeywordResponder.respond("clothes", Some(&conditions(2.0, "clear sky")));
        assert!(cold.starts_with("Bundle up!"));
    }

    #[test]
    fn unmatched_uses_default_pool() {
        assert_eq!(KeywordResponder.classify("zzz"), None);
        for _ in 0..10 {
            let reply = KeywordResponder.respond("zzz", None);
            assert!(DEFAULT_REPLIES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn responder_is_object_safe() {
        let boxed: Box<dyn Responder> = Box::new(KeywordResponder::new());
        assert!(!boxed.respond("thanks!", None).is_empty());
    }
}
