//! Shared fixture for integration tests: ten well-known Steam titles.

#![allow(dead_code)]

use chrono::NaiveDate;
use gamedex::{Engine, GameRecord};

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%b %d, %Y").unwrap()
}

pub fn game(name: &str, released: &str, reviews: &str, price: f64, tags: &str) -> GameRecord {
    GameRecord::with_tag_list(name, date(released), reviews, price, tags, ',')
}

pub fn fixture_records() -> Vec<GameRecord> {
    vec![
        game(
            "Counter-Strike: Global Offensive",
            "Aug 21, 2012",
            "Very Positive,(3,094,223),- 86% of the 3,094,223 user reviews for this game are positive.",
            0.00,
            "FPS,Shooter,Multiplayer,Competitive,Action,Team-Based,e-sports,Tactical,First-Person,PvP,Online Co-Op,Co-op,Strategy,Military,War,Difficult,Trading,Fast-Paced,Realistic,Moddable",
        ),
        game(
            "Dota 2",
            "Jul 09, 2013",
            "Very Positive,(1,015,621),- 85% of the 1,015,621 user reviews for this game are positive.",
            0.00,
            "Free to Play,MOBA,Multiplayer,Strategy,e-sports,Team-Based,Competitive,Action,Online Co-Op,PvP,Difficult,Co-op,RTS,Tower Defense,Fantasy,RPG,Character Customization,Replay Value,Action RPG,Simulation",
        ),
        game(
            "PLAYERUNKNOWN'S BATTLEGROUNDS",
            "Dec 21, 2017",
            "Mixed,(836,608),- 49% of the 836,608 user reviews for this game are positive.",
            29.99,
            "Survival,Shooter,Multiplayer,Battle Royale,PvP,FPS,Third-Person Shooter,Action,Online Co-Op,Tactical,Co-op,First-Person,Early Access,Strategy,Competitive,Third Person,Team-Based,Difficult,Simulation,Stealth",
        ),
        game(
            "Team Fortress 2",
            "Oct 10, 2007",
            "Very Positive,(553,458),- 93% of the 553,458 user reviews for this game are positive.",
            0.00,
            "Free to Play,Multiplayer,FPS,Shooter,Action,Class-Based,Team-Based,Funny,First-Person,Online Co-Op,Competitive,Cartoony,Trading,Co-op,Comedy,Robots,Tactical,Cartoon,Crafting,Moddable",
        ),
        game(
            "Grand Theft Auto V",
            "Apr 14, 2015",
            "Mostly Positive,(407,706),- 70% of the 407,706 user reviews for this game are positive.",
            29.99,
            "Open World,Action,Multiplayer,Third Person,First-Person,Crime,Shooter,Adventure,Third-Person Shooter,Singleplayer,Mature,Racing,Atmospheric,Co-op,Sandbox,Funny,Great Soundtrack,Comedy,Masterpiece,Moddable",
        ),
        game(
            "Unturned",
            "Jul 07, 2017",
            "Very Positive,(325,675),- 90% of the 325,675 user reviews for this game are positive.",
            0.00,
            "Free to Play,Survival,Zombies,Multiplayer,Open World,Adventure,Crafting,Action,First-Person,Co-op,Sandbox,Shooter,Post-apocalyptic,FPS,Singleplayer,Massively Multiplayer,Indie,Atmospheric,Casual,Early Access",
        ),
        game(
            "Garry's Mod",
            "Nov 29, 2006",
            "Overwhelmingly Positive,(310,394),- 95% of the 310,394 user reviews for this game are positive.",
            9.99,
            "Sandbox,Multiplayer,Funny,Moddable,Building,Comedy,Co-op,First-Person,Mod,Simulation,Physics,Online Co-Op,FPS,Singleplayer,Action,Shooter,Animation & Modeling,Indie,Massively Multiplayer,Adventure",
        ),
        game(
            "Strata Spaces VR – Professional Edition Upgrade",
            "Oct 26, 2017",
            "",
            995.00,
            "Design & Illustration,Animation & Modeling",
        ),
        game(
            "Crankies Workshop: Bozzbot Assembly",
            "Sep 13, 2017",
            "Mixed,(28),- 46% of the 28 user reviews for this game are positive.",
            624.74,
            "Casual,Indie,Simulation,Strategy,Action,Funny,Singleplayer,2D,Atmospheric,Colorful,Cartoony,Puzzle,Cartoon,Sequel,Family Friendly,Replay Value,Comedy",
        ),
        game(
            "Crankies Workshop: Grizzbot Assembly",
            "Sep 12, 2017",
            "Mixed,(22),- 68% of the 22 user reviews for this game are positive.",
            624.74,
            "Casual,Indie,Strategy,Simulation,Action,Singleplayer,2D,Atmospheric,Cartoony,Colorful,Funny,Puzzle,Family Friendly,Choices Matter,Text-Based,Real-Time,Time Management",
        ),
    ]
}

pub fn fixture_engine() -> Engine {
    Engine::from_records(fixture_records())
}
