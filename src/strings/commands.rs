//! # Command Definitions
//!
//! Slash-command payload sent by `register-commands`. Names must match the router.

use serde_json::{Value, json};

const STRING: u8 = 3;
const INTEGER: u8 = 4;
const USER: u8 = 6;

fn user_option(description: &str) -> Value {
    json!({ "name": "user", "description": description, "type": USER, "required": false })
}

pub fn definitions() -> Value {
    json!([
        { "name": "ping", "description": "Test command" },
        { "name": "code", "description": "Link to the bot's source code" },
        {
            "name": "download",
            "description": "Download a TikTok or Instagram video",
            "options": [
                { "name": "url", "description": "Video URL", "type": STRING, "required": true }
            ]
        },
        {
            "name": "set-birthday",
            "description": "Save a birthday",
            "options": [
                { "name": "day", "description": "Day (1-31)", "type": INTEGER, "required": true, "min_value": 1, "max_value": 31 },
                { "name": "month", "description": "Month (1-12)", "type": INTEGER, "required": true, "min_value": 1, "max_value": 12 },
                { "name": "year", "description": "Year", "type": INTEGER, "required": true, "min_value": 1900 },
                user_option("Whose birthday (defaults to you)")
            ]
        },
        {
            "name": "remove-birthday",
            "description": "Remove a saved birthday",
            "options": [ user_option("Whose birthday (defaults to you)") ]
        },
        {
            "name": "add-league-account",
            "description": "Link a Riot account",
            "options": [
                { "name": "game-name", "description": "Riot game name", "type": STRING, "required": true },
                { "name": "tag-line", "description": "Riot tag line (without #)", "type": STRING, "required": true },
                user_option("Who to link (defaults to you)")
            ]
        },
        {
            "name": "remove-league-account",
            "description": "Unlink a Riot account",
            "options": [ user_option("Who to unlink (defaults to you)") ]
        },
        {
            "name": "ranked",
            "description": "Solo/Duo rank and recent games",
            "options": [ user_option("Player (defaults to you)") ]
        },
        {
            "name": "flex",
            "description": "Flex rank and recent games",
            "options": [ user_option("Player (defaults to you)") ]
        },
        { "name": "ranked-race", "description": "Solo/Duo leaderboard of linked accounts" },
        { "name": "flex-race", "description": "Flex leaderboard of linked accounts" }
    ])
}
