// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// popdist - Pairwise genetic distance calculator for Structure-formatted genotype data
pub struct Args {
    /// path to the primary Structure-formatted genotype file
    #[argh(option)]
    pub input: Option<String>,

    /// extra Structure-formatted file to merge into the primary dataset (repeatable)
    #[argh(option)]
    pub merge: Vec<String>,

    /// output distance matrix file
    #[argh(option)]
    pub output: Option<String>,

    /// output format: tsv, csv, phylip, nexus (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// treat sources as haploid, one row per individual (default: diploid)
    #[argh(switch)]
    pub haploid: bool,

    /// treat allele codes as microsatellite repeat counts (default: SNP nucleotide decode)
    #[argh(switch)]
    pub microsatellite: bool,

    /// number of ignored columns after the flag column (default: 0)
    #[argh(option, default = "0")]
    pub optional_cols: i64,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// include only samples matching regex pattern in the output matrix
    #[argh(option)]
    pub include_samples: Option<String>,

    /// exclude samples matching regex pattern from the output matrix
    #[argh(option)]
    pub exclude_samples: Option<String>,

    /// show dataset statistics only, then exit
    #[argh(switch)]
    pub stats_only: bool,

    /// validate and load inputs without computing distances (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
