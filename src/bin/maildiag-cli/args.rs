use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use maildiag_lib::{Kind, ParserOptions, ValidationMode};

#[derive(Parser)]
#[command(name = "maildiag-cli", version, about = "Diagnostic syntaxique d'adresses e-mail")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// écrit le rapport dans un fichier (JSON/NDJSON/CSV selon --format)
    #[arg(long)]
    pub out: Option<String>,

    /// mode: strict|relaxed
    #[arg(long, default_value = "strict")]
    pub mode: String,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// affiche le pire diagnostic avec son message et ses références
    #[arg(long)]
    pub diagnose: bool,

    /// affiche tous les diagnostics relevés
    #[arg(long)]
    pub all: bool,

    /// active les avertissements TLD / TLD numérique
    #[arg(long)]
    pub tld_warnings: bool,

    /// tag attendu (ex: ISEMAIL_ERR_DOT_START) ; le code de sortie indique la correspondance
    #[arg(long)]
    pub expect: Option<String>,

    /// convertit les pictogrammes U+2400..U+240D en caractères de contrôle
    #[arg(long)]
    pub control_pictures: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    Validate {
        /// mode: strict|relaxed (prend le pas sur l'option globale)
        #[arg(long)]
        mode: Option<String>,
        email: String,
    },
    /// décrit un tag de diagnostic (bande, code, message, références)
    Explain { tag: String },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    /// Options du scanner ; le mode de la sous-commande a priorité.
    pub fn parser_options(&self, sub_mode: Option<&str>) -> Result<ParserOptions> {
        let mode = mode_from_str(sub_mode.unwrap_or(&self.mode))?;
        let options = ParserOptions::standard().with_mode(mode);
        Ok(if self.tld_warnings {
            options.with_tld_warnings()
        } else {
            options
        })
    }

    pub fn expected_kind(&self) -> Result<Option<Kind>> {
        self.expect
            .as_deref()
            .map(|tag| tag.parse::<Kind>())
            .transpose()
            .context("invalid --expect")
    }
}

pub fn mode_from_str(s: &str) -> Result<ValidationMode> {
    match s {
        "strict" => Ok(ValidationMode::Strict),
        "relaxed" => Ok(ValidationMode::Relaxed),
        other => bail!("unknown --mode '{other}', use: strict|relaxed"),
    }
}

/// Les corpus de test écrivent CR, LF, HTAB... sous forme de pictogrammes.
pub fn decode_control_pictures(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{2400}'..='\u{240D}' => char::from((u32::from(c) - 0x2400) as u8),
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes() {
        assert_eq!(mode_from_str("relaxed").ok(), Some(ValidationMode::Relaxed));
        assert!(mode_from_str("lenient").is_err());
    }

    #[test]
    fn control_pictures_become_controls() {
        assert_eq!(
            decode_control_pictures("test\u{240D}\u{240A} @example.com"),
            "test\r\n @example.com"
        );
        assert_eq!(decode_control_pictures("\u{2400}\u{2409}"), "\0\t");
        assert_eq!(decode_control_pictures("plain"), "plain");
    }

    #[test]
    fn flags_build_options() {
        let cli = Cli::try_parse_from([
            "maildiag-cli",
            "--mode",
            "relaxed",
            "--tld-warnings",
            "validate",
            "a@b",
        ])
        .expect("valid flags");
        let options = cli.parser_options(None).expect("known mode");
        assert_eq!(options.mode, ValidationMode::Relaxed);
        assert!(options.tld_warnings);
        let options = cli.parser_options(Some("strict")).expect("known mode");
        assert_eq!(options.mode, ValidationMode::Strict);

        let cli = Cli::try_parse_from(["maildiag-cli", "validate", "a@b"]).expect("valid flags");
        let options = cli.parser_options(None).expect("known mode");
        assert_eq!(options, ParserOptions::standard());
    }

    #[test]
    fn expect_accepts_short_tags() {
        let cli = Cli::try_parse_from(["maildiag-cli", "--expect", "err_dot_start", "--stdin"])
            .expect("valid flags");
        assert_eq!(cli.expected_kind().ok().flatten(), Some(Kind::DotStart));

        let cli = Cli::try_parse_from(["maildiag-cli", "--expect", "nope", "--stdin"])
            .expect("valid flags");
        assert!(cli.expected_kind().is_err());
    }
}
