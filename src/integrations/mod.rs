pub mod clawdbot;
