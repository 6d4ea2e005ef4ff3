use std::collections::BTreeSet;

use async_trait::async_trait;

use super::traits::{CommandError, CommandHandler};
use super::types::{CommandContext, CommandReply, SLASH_COMMAND};
use crate::ledger::{
    ChooseBy, ErrorKind, Ledger, NewTopic, PointsAward, RankOrder, TopicField,
};

const FORMAT_ERROR: &str =
    "That doesn't look right. Check `/points help` for the expected format";

fn tokens(args: &str) -> Vec<&str> {
    args.split_whitespace().collect()
}

fn missing_topic(name: &str) -> CommandReply {
    CommandReply::text(format!(
        "Topic {name} doesn't exist. Create it first with `{SLASH_COMMAND} addTopic {name}`"
    ))
}

fn nobody_scored(name: &str) -> CommandReply {
    CommandReply::text(format!("Nobody has points in _{name}_ yet"))
}

fn points_label(points: i64) -> &'static str {
    if points.unsigned_abs() == 1 { "point" } else { "points" }
}

/// `help`: usage of every registered command
pub struct HelpCommand {
    text: String,
}

impl HelpCommand {
    pub fn new<'a>(usages: impl IntoIterator<Item = &'a str>) -> Self {
        let mut text = String::from("Hi! I keep score of points per topic. This is what I understand:\n");
        for usage in usages {
            text.push_str("\n    ");
            text.push_str(usage);
        }
        text.push_str("\n    ");
        text.push_str(HELP_USAGE);
        Self { text }
    }
}

const HELP_USAGE: &str = "`/points help` -> Show this guide";

#[async_trait]
impl CommandHandler for HelpCommand {
    fn usage(&self) -> &'static str {
        HELP_USAGE
    }

    async fn execute(
        &self,
        _ledger: &Ledger,
        _args: &str,
        _ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError> {
        Ok(CommandReply::text(self.text.clone()))
    }
}

/// `addTopic <name> [listHidden] [noRemove] [chooseBy=min|max] [channels=C1,C2]`
pub struct AddTopicCommand;

impl AddTopicCommand {
    fn parse(tokens: &[&str]) -> Option<NewTopic> {
        let (name, options) = tokens.split_first()?;

        let mut list_hidden = false;
        let mut allow_points_remove = true;
        let mut choose_by = ChooseBy::Min;
        let mut allowed_channels = BTreeSet::new();

        for option in options {
            match *option {
                "listHidden" => list_hidden = true,
                "noRemove" => allow_points_remove = false,
                other => {
                    if let Some(value) = other.strip_prefix("chooseBy=") {
                        choose_by = value.parse().ok()?;
                    } else if let Some(value) = other.strip_prefix("channels=") {
                        allowed_channels.extend(
                            value
                                .split(',')
                                .filter(|channel| !channel.is_empty())
                                .map(String::from),
                        );
                    } else {
                        return None;
                    }
                }
            }
        }

        Some(
            NewTopic::builder()
                .name(*name)
                .list_hidden(list_hidden)
                .allow_points_remove(allow_points_remove)
                .choose_by(choose_by)
                .allowed_channels(allowed_channels)
                .build(),
        )
    }
}

#[async_trait]
impl CommandHandler for AddTopicCommand {
    fn usage(&self) -> &'static str {
        "`/points addTopic <topic> [listHidden] [noRemove] [chooseBy=min|max] [channels=C1,C2]` -> Add a new topic to track points"
    }

    async fn execute(
        &self,
        ledger: &Ledger,
        args: &str,
        _ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError> {
        let Some(topic) = Self::parse(&tokens(args)) else {
            return Ok(CommandReply::text(FORMAT_ERROR));
        };
        let name = topic.name.clone();

        match ledger.create_topic(topic).await {
            Ok(()) => Ok(CommandReply::text(format!(
                "Topic _{name}_ created. Start handing out points!"
            ))),
            Err(err) => match err.kind() {
                ErrorKind::AlreadyExists => Ok(CommandReply::text(format!(
                    "Topic _{name}_ already exists, go use it!"
                ))),
                ErrorKind::InvalidInput => Ok(CommandReply::text(
                    "Topic names can't contain spaces or control characters",
                )),
                _ => Err(err.into()),
            },
        }
    }
}

/// `give|remove <user> <amount|points> in <topic>`
///
/// A numeric second token is the amount; any other word counts as one point.
pub struct PointsCommand {
    sign: i64,
}

impl PointsCommand {
    pub fn give() -> Self {
        Self { sign: 1 }
    }

    pub fn remove() -> Self {
        Self { sign: -1 }
    }
}

#[async_trait]
impl CommandHandler for PointsCommand {
    fn usage(&self) -> &'static str {
        if self.sign > 0 {
            "`/points give @user <amount|points> in <topic>` -> Give points to a user"
        } else {
            "`/points remove @user <amount|points> in <topic>` -> Take points from a user"
        }
    }

    async fn execute(
        &self,
        ledger: &Ledger,
        args: &str,
        ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError> {
        let tokens = tokens(args);
        let [user, amount, _, topic] = tokens.as_slice() else {
            return Ok(CommandReply::text(FORMAT_ERROR));
        };

        let amount = match amount.parse::<i64>() {
            Ok(amount) if amount >= 0 => amount,
            Ok(_) => {
                return Ok(CommandReply::text(
                    "Amounts are always positive, use give or remove to pick the direction",
                ));
            }
            Err(_) => 1,
        };
        let points = amount * self.sign;
        if points == 0 {
            return Ok(CommandReply::text(
                "Give or remove some points, zero won't do anything",
            ));
        }

        let fields = [TopicField::AllowedChannels, TopicField::AllowPointsRemove];
        let Some(view) = ledger.get_topic(topic, &fields).await? else {
            return Ok(missing_topic(topic));
        };

        let allowed_channels = view.allowed_channels.unwrap_or_default();
        if !allowed_channels.is_empty() && !allowed_channels.contains(&ctx.channel_id) {
            return Ok(CommandReply::text(
                "That topic can't be used in this channel",
            ));
        }

        if points < 0 && !view.allow_points_remove.unwrap_or(true) {
            return Ok(CommandReply::text(
                "That topic doesn't allow removing points",
            ));
        }

        let award = PointsAward::new(*user, ctx.giver_handle(), ctx.channel_handle(), points);
        match ledger.award_points(topic, award).await {
            Ok(_) => {
                let verb = if points > 0 { "got" } else { "lost" };
                let count = points.unsigned_abs();
                Ok(CommandReply::in_channel(format!(
                    "{user} {verb} {count} {} in _{topic}_",
                    points_label(points)
                )))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(missing_topic(topic)),
            Err(err) => Err(err.into()),
        }
    }
}

/// `rank top|bottom <n> in <topic>`
pub struct RankCommand;

#[async_trait]
impl CommandHandler for RankCommand {
    fn usage(&self) -> &'static str {
        "`/points rank top|bottom <n> in <topic>` -> List the <n> top/bottom users of a topic"
    }

    async fn execute(
        &self,
        ledger: &Ledger,
        args: &str,
        _ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError> {
        let tokens = tokens(args);
        let [order, limit, _, topic] = tokens.as_slice() else {
            return Ok(CommandReply::text(FORMAT_ERROR));
        };
        let (Ok(order), Ok(limit)) = (order.parse::<RankOrder>(), limit.parse::<usize>()) else {
            return Ok(CommandReply::text(FORMAT_ERROR));
        };

        let standings = match ledger.rank(topic, order, limit).await {
            Ok(standings) => standings,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(missing_topic(topic)),
            Err(err) => return Err(err.into()),
        };

        if standings.is_empty() {
            return Ok(nobody_scored(topic));
        }

        let direction = match order {
            RankOrder::Top => "top",
            RankOrder::Bottom => "bottom",
        };
        let lines: Vec<String> = standings
            .iter()
            .map(|s| format!("{} has {} {}", s.user, s.points, points_label(s.points)))
            .collect();

        Ok(CommandReply::in_channel(format!(
            "The {limit} {direction} users for the _{topic}_ topic are:\n\n{}",
            lines.join("\n")
        )))
    }
}

/// `list`: every topic not created with `listHidden`
pub struct ListCommand;

#[async_trait]
impl CommandHandler for ListCommand {
    fn usage(&self) -> &'static str {
        "`/points list` -> List the existing topics"
    }

    async fn execute(
        &self,
        ledger: &Ledger,
        _args: &str,
        _ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError> {
        let mut names = ledger.list_visible_topics().await?;
        if names.is_empty() {
            return Ok(CommandReply::text(format!(
                "There are no topics yet. Create one with `{SLASH_COMMAND} addTopic <topic>`"
            )));
        }

        names.sort();
        Ok(CommandReply::in_channel("The current topics are:").with_attachment(names.join("\n")))
    }
}

/// `chooseNext in <topic>`: random pick among the users at the topic's extremum
pub struct ChooseNextCommand;

#[async_trait]
impl CommandHandler for ChooseNextCommand {
    fn usage(&self) -> &'static str {
        "`/points chooseNext in <topic>` -> Pick the next one, by least (or most) points"
    }

    async fn execute(
        &self,
        ledger: &Ledger,
        args: &str,
        _ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError> {
        let tokens = tokens(args);
        let topic = match tokens.as_slice() {
            [topic] | ["in", topic] => *topic,
            _ => return Ok(CommandReply::text(FORMAT_ERROR)),
        };

        match ledger.choose_winner(topic).await {
            Ok(winner) => Ok(CommandReply::in_channel(format!(
                "The chosen one for _{topic}_ is:"
            ))
            .with_attachment(format!(
                "{} ({} {})",
                winner.user,
                winner.points,
                points_label(winner.points)
            ))),
            Err(err) => match err.kind() {
                ErrorKind::NotFound => Ok(missing_topic(topic)),
                ErrorKind::EmptyTotals => Ok(nobody_scored(topic)),
                _ => Err(err.into()),
            },
        }
    }
}
