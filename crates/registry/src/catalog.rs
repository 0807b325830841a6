//! The compiled-in command catalog.
//!
//! One function per section keeps the literal readable; the section order
//! here is the order shown in the console.

use hllrcon_types::HttpMethod::{Delete, Get, Post, Put};
use hllrcon_types::{Command, Field, Section, SelectOption};

const STEAM_ID: &str = "76561198123456789";

/// Every section of the administration API, in display order.
pub fn builtin_sections() -> Vec<Section> {
    vec![
        connection(),
        server_information(),
        player_management(),
        vips(),
        admins(),
        bans(),
        maps(),
        server_settings(),
        match_timers(),
    ]
}

fn player_id() -> Field {
    Field::text("player_id").placeholder(STEAM_ID)
}

fn reason(placeholder: &str) -> Field {
    Field::text("reason").placeholder(placeholder)
}

fn enable() -> Field {
    Field::checkbox("enable", true)
}

fn game_mode(modes: &[&str]) -> Field {
    Field::select("game_mode", modes.iter().copied().map(SelectOption::literal).collect()).placeholder("Select game mode")
}

fn index(placeholder: &str) -> Field {
    Field::number("index").placeholder(placeholder)
}

fn connection() -> Section {
    Section::new(
        "Connection",
        vec![
            Command::new(
                "ServerConnect",
                Get,
                "/api/v2/connection/status",
                "Establishes an Rcon V2 connection with the server. Returns the XOR Key in the content body. (Handled automatically on connect)",
            ),
            Command::new(
                "Login",
                Get,
                "/api/v2/connection/status",
                "Authenticates a client to access the server. (Handled automatically on connect)",
            ),
        ],
    )
}

fn server_information() -> Section {
    let info_types = [
        "session",
        "serverconfig",
        "players",
        "player",
        "maprotation",
        "mapsequence",
        "bannedwords",
        "vipplayers",
    ];

    Section::new(
        "Server Information",
        vec![
            Command::new(
                "GetServerInformation",
                Get,
                "/api/v2/server",
                "Retrieves various server information. Select type: players, player (requires Value=PlayerID), maprotation, mapsequence, session, serverconfig, bannedwords, vipplayers",
            )
            .with_fields(vec![
                Field::select("type", info_types.into_iter().map(SelectOption::literal).collect())
                    .placeholder("Select information type")
                    .describe("Type of information to retrieve"),
                Field::text("value")
                    .placeholder("Player ID (e.g. 76561198123456789)")
                    .describe("Value (required for 'player' type - use Player ID)")
                    .visible_when("type", ["player"]),
            ]),
            Command::new(
                "GetAdminLog",
                Get,
                "/api/v2/logs",
                "Retrieve admin log for the specified interval time (seconds)",
            )
            .with_fields(vec![
                Field::number("seconds")
                    .placeholder("3600")
                    .describe("How many seconds to look back in time"),
            ]),
            Command::new("GetDisplayableCommands", Get, "/api/v2/commands", "Retrieves the list of RCON commands"),
            Command::new(
                "GetClientReferenceData",
                Get,
                "/api/v2/command-reference",
                "Retrieves argument details for a specific command",
            )
            .with_fields(vec![
                Field::text("command")
                    .placeholder("AddAdmin")
                    .describe("Command ID to get reference data for"),
            ]),
            Command::new(
                "GetServerChangelist",
                Get,
                "/api/v2/changelist",
                "Retrieves the change list build number for the server",
            ),
            Command::new(
                "SetWelcomeMessage",
                Post,
                "/api/v2/welcome-message",
                "Send a message to the server (sets welcome message)",
            )
            .with_fields(vec![
                Field::text("message")
                    .placeholder("Welcome to our server!")
                    .describe("Welcome message to display to players"),
            ]),
            Command::new("ServerBroadcast", Post, "/api/v2/broadcast", "Create a message to broadcast to the server").with_fields(vec![
                Field::multiline("message")
                    .placeholder("Server restart in 5 minutes")
                    .describe("Message to broadcast to all players"),
            ]),
        ],
    )
}

fn player_management() -> Section {
    Section::new(
        "Player Management",
        vec![
            Command::new("MessagePlayer", Post, "/api/v2/players/:id/message", "Sends a message to a specific player.")
                .with_fields(vec![player_id(), Field::text("message").placeholder("Your message here")]),
            Command::new("PunishPlayer", Post, "/api/v2/punish", "Punishes a player by killing their character.")
                .with_fields(vec![player_id(), reason("Team killing")]),
            Command::new("KickPlayer", Post, "/api/v2/kick", "Kicks a player from the server.").with_fields(vec![player_id(), reason("Griefing")]),
            Command::new(
                "ForceTeamSwitch",
                Post,
                "/api/v2/force-team-switch",
                "Forces a player to switch team. Can force a player to switch either on death or immediately.",
            )
            .with_fields(vec![
                player_id(),
                Field::select(
                    "force_mode",
                    vec![
                        SelectOption::labelled("0", "0 - On Death"),
                        SelectOption::labelled("1", "1 - Immediately"),
                    ],
                )
                .placeholder("Select force mode"),
            ]),
            Command::new(
                "RemovePlayerFromPlatoon",
                Post,
                "/api/v2/remove-from-squad",
                "Removes a player from their platoon.",
            )
            .with_fields(vec![player_id(), reason("Reason")]),
            Command::new("DisbandPlatoon", Post, "/api/v2/disband-squad", "Disbands a platoon and removes all players.").with_fields(vec![
                Field::number("team_index").placeholder("0"),
                Field::number("squad_index").placeholder("0"),
                reason("Reason"),
            ]),
        ],
    )
}

fn vips() -> Section {
    Section::new(
        "VIPs",
        vec![
            Command::new("AddVip", Post, "/api/v2/vips", "Gives a player VIP status.")
                .with_fields(vec![player_id(), Field::text("comment").placeholder("Tournament winner")]),
            Command::new("RemoveVip", Delete, "/api/v2/vips", "Removes VIP status from a player.").with_fields(vec![player_id()]),
            Command::new("SetVipSlotCount", Post, "/api/v2/vip-slots", "Set the VIP slot count for the server.")
                .with_fields(vec![Field::number("vip_slot_count").placeholder("10")]),
        ],
    )
}

fn admins() -> Section {
    Section::new(
        "Admins",
        vec![
            Command::new("GetAdminUsers", Get, "/api/v2/admins", "Retrieves a list of all admin users."),
            Command::new("GetAdminGroups", Get, "/api/v2/admin-groups", "Retrieves a list of all admin groups."),
            Command::new("AddAdmin", Post, "/api/v2/admins", "Adds a player to an admin group.").with_fields(vec![
                player_id(),
                Field::text("admin_group").placeholder("Moderator"),
                Field::text("comment").placeholder("Trusted player"),
            ]),
            Command::new("RemoveAdmin", Delete, "/api/v2/admins", "Removes the admin privileges from a player.").with_fields(vec![player_id()]),
        ],
    )
}

fn bans() -> Section {
    Section::new(
        "Bans",
        vec![
            Command::new("GetPermanentBans", Get, "/api/v2/bans?type=perma", "Retrieves a list of all permanent player bans."),
            Command::new("GetTemporaryBans", Get, "/api/v2/bans?type=temp", "Retrieves a list of all temporary player bans."),
            Command::new(
                "TemporaryBanPlayer",
                Post,
                "/api/v2/temp-ban",
                "Bans a player from the server for a certain duration.",
            )
            .with_fields(vec![
                player_id(),
                Field::number("duration").placeholder("24"),
                reason("Team killing"),
                Field::text("admin_name").placeholder("Your name"),
            ]),
            Command::new("RemoveTemporaryBan", Delete, "/api/v2/temp-ban", "Removes a temporary ban from a player.").with_fields(vec![player_id()]),
            Command::new("PermanentBanPlayer", Post, "/api/v2/perma-ban", "Bans a player from a server permanently.").with_fields(vec![
                player_id(),
                reason("Cheating"),
                Field::text("admin_name").placeholder("Your name"),
            ]),
            Command::new("RemovePermanentBan", Delete, "/api/v2/perma-ban", "Removes a permanent ban from a player.").with_fields(vec![player_id()]),
        ],
    )
}

fn maps() -> Section {
    let map_name = || Field::text("map_name").placeholder("carentan_warfare");

    Section::new(
        "Maps",
        vec![
            Command::new("ChangeMap", Post, "/api/v2/change-map", "Triggers a map change on the server.").with_fields(vec![map_name()]),
            Command::new(
                "SetSectorLayout",
                Post,
                "/api/v2/sector-layout",
                "Triggers a map restart and sets the objectives to the specified sectors.",
            )
            .with_fields(
                (1..=5)
                    .map(|sector| Field::text(format!("sector_{sector}")).placeholder(format!("AAS_N_F{sector}")))
                    .collect(),
            ),
            Command::new(
                "AddMapToRotation",
                Post,
                "/api/v2/map-rotation",
                "Adds a map to the map rotation at a specified index.",
            )
            .with_fields(vec![map_name(), index("0")]),
            Command::new(
                "RemoveMapFromRotation",
                Delete,
                "/api/v2/map-rotation",
                "Removes a map from the rotation list at a specified index.",
            )
            .with_fields(vec![index("0")]),
            Command::new(
                "AddMapToSequence",
                Post,
                "/api/v2/map-sequence",
                "Adds a map to the map sequence at a specified index.",
            )
            .with_fields(vec![map_name(), index("0")]),
            Command::new(
                "RemoveMapFromSequence",
                Delete,
                "/api/v2/map-sequence",
                "Remove a map from the map sequence at a specified index.",
            )
            .with_fields(vec![index("0")]),
            Command::new("SetMapShuffleEnabled", Post, "/api/v2/map-shuffle", "Randomises the map sequence.").with_fields(vec![enable()]),
            Command::new(
                "MoveMapInSequence",
                Put,
                "/api/v2/map-sequence/move",
                "Moves a current map in the sequence to another location.",
            )
            .with_fields(vec![
                Field::number("current_index").placeholder("0"),
                Field::number("new_index").placeholder("1"),
            ]),
        ],
    )
}

fn server_settings() -> Section {
    Section::new(
        "Server Settings",
        vec![
            Command::new(
                "SetTeamSwitchCooldown",
                Post,
                "/api/v2/team-switch-cooldown",
                "Sets the cooldown time for allowing players to switch teams.",
            )
            .with_fields(vec![Field::number("team_switch_timer").placeholder("180")]),
            Command::new(
                "SetMaxQueuedPlayers",
                Post,
                "/api/v2/max-queued-players",
                "Sets the max number of players allowed to queue for the server.",
            )
            .with_fields(vec![Field::number("max_queued_players").placeholder("10")]),
            Command::new(
                "SetIdleKickDuration",
                Post,
                "/api/v2/idle-kick-duration",
                "Sets the duration for kicking players for idling.",
            )
            .with_fields(vec![Field::number("idle_timeout_minutes").placeholder("15")]),
            Command::new(
                "SetHighPingThreshold",
                Post,
                "/api/v2/high-ping-threshold",
                "Sets the threshold for players with high ping.",
            )
            .with_fields(vec![Field::number("high_ping_threshold_ms").placeholder("250")]),
            Command::new(
                "SetAutoBalanceEnabled",
                Post,
                "/api/v2/auto-balance/enabled",
                "Enables or disables team auto balancing for the sever.",
            )
            .with_fields(vec![enable()]),
            Command::new(
                "SetAutoBalanceThreshold",
                Post,
                "/api/v2/auto-balance/threshold",
                "Sets the player threshold number for team auto balancing.",
            )
            .with_fields(vec![Field::number("auto_balance_threshold").placeholder("5")]),
            Command::new("ResetVoteKickThreshold", Post, "/api/v2/vote-kick/reset", "Resets the vote to kick threshold."),
            Command::new(
                "SetVoteKickEnabled",
                Post,
                "/api/v2/vote-kick/enabled",
                "Enables or disables the vote to kick functionality.",
            )
            .with_fields(vec![enable()]),
            Command::new("SetVoteKickThreshold", Post, "/api/v2/vote-kick/threshold", "Sets the vote to kick threshold.")
                .with_fields(vec![Field::text("threshold_value").placeholder("1,10,10,5")]),
            Command::new(
                "AddBannedWords",
                Post,
                "/api/v2/profanities",
                "Adds words to the custom profanity filter. Words should be separated with a comma.",
            )
            .with_fields(vec![Field::text("banned_words").placeholder("word1,word2,word3")]),
            Command::new(
                "RemoveBannedWords",
                Delete,
                "/api/v2/profanities",
                "Removes words from the custom profanity filter. Words should be separated with a comma.",
            )
            .with_fields(vec![Field::text("banned_words").placeholder("word1,word2")]),
        ],
    )
}

fn match_timers() -> Section {
    const ALL_MODES: &[&str] = &["Warfare", "Offensive", "Skirmish"];
    const WARMUP_MODES: &[&str] = &["Warfare", "Skirmish"];

    Section::new(
        "Match Timers",
        vec![
            Command::new(
                "SetMatchTimer",
                Post,
                "/api/v2/match-timer",
                "Sets the match time of a specified game mode in minutes. For offensive the match timer is the length of each control point phase. Match timers are limited to the following ranges: Warfare: 30-180 minutes, Offensive: 10-60 minutes, Skirmish: 10-60 minutes.",
            )
            .with_fields(vec![game_mode(ALL_MODES), Field::number("match_length").placeholder("90")]),
            Command::new(
                "RemoveMatchTimer",
                Delete,
                "/api/v2/match-timer",
                "Removes the custom match timers for the specified game mode.",
            )
            .with_fields(vec![game_mode(ALL_MODES)]),
            Command::new(
                "SetWarmupTimer",
                Post,
                "/api/v2/warmup-timer",
                "Sets the warmup timer for a specified game mode in minutes. Only supports Warfare and Skirmish. Warmup timers are limited to the following ranges: 1-10 Minutes.",
            )
            .with_fields(vec![game_mode(WARMUP_MODES), Field::number("warmup_length").placeholder("5")]),
            Command::new(
                "RemoveWarmupTimer",
                Delete,
                "/api/v2/warmup-timer",
                "Removes the custom warmup timer for a specified game mode.",
            )
            .with_fields(vec![game_mode(WARMUP_MODES)]),
            Command::new(
                "SetDynamicWeatherEnabled",
                Post,
                "/api/v2/dynamic-weather",
                "Enables or disabled dynamic weather for a specific map. Command only functions for maps that use the dynamic weather system.",
            )
            .with_fields(vec![Field::text("map_id").placeholder("carentan_warfare"), enable()]),
        ],
    )
}
