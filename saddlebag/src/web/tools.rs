//! The search tools listed on the home page and in the navigation bar.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Game {
    Ffxiv,
    Wow,
}

impl Game {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Game::Ffxiv => "Final Fantasy XIV",
            Game::Wow => "World of Warcraft",
        }
    }

    pub(crate) fn tools(self) -> impl Iterator<Item = &'static Tool> {
        TOOLS.iter().filter(move |tool| tool.game == self)
    }
}

#[derive(Debug)]
pub(crate) struct Tool {
    pub(crate) name: &'static str,
    pub(crate) path: &'static str,
    pub(crate) game: Game,
    pub(crate) summary: &'static str,
}

pub(crate) const TOOLS: &[Tool] = &[
    Tool {
        name: "Marketshare",
        path: "/ffxiv/marketshare",
        game: Game::Ffxiv,
        summary: "Which items move the most gil on your world, and whether their prices are rising or crashing.",
    },
    Tool {
        name: "Craftsim",
        path: "/ffxiv/craftsim",
        game: Game::Ffxiv,
        summary: "Rank recipes by profit using current material costs and recent sale prices.",
    },
    Tool {
        name: "Price Groups",
        path: "/ffxiv/price-groups",
        game: Game::Ffxiv,
        summary: "Compare week over week price changes for your own groups of items and categories.",
    },
    Tool {
        name: "Undercut Alerts",
        path: "/ffxiv/undercut",
        game: Game::Ffxiv,
        summary: "Generate the configuration for retainer undercut alerts.",
    },
    Tool {
        name: "Shortage Finder",
        path: "/wow/shortages",
        game: Game::Wow,
        summary: "Find items that are selling out on your realm before the price climbs.",
    },
    Tool {
        name: "Marketshare",
        path: "/wow/marketshare",
        game: Game::Wow,
        summary: "Current and historic market value of items on your realm.",
    },
    Tool {
        name: "Export Search",
        path: "/wow/export",
        game: Game::Wow,
        summary: "Find the realms in a region with the cheapest supply of an item.",
    },
];
