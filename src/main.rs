use clap::{Parser, Subcommand};
use mbus_master::{
    decode_record, init_logger, ExchangeResult, MBusError, MBusMaster, SerialMBusPort,
};

#[derive(Parser)]
#[command(name = "mbus-master")]
#[command(about = "CLI tool for master-side M-Bus communication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send SND_NKE to reset a slave
    Init {
        port: String,
        address: u8,
    },
    /// Poll a slave with REQ_UD2 and print the raw response
    Request {
        port: String,
        address: u8,
    },
    /// Decode a hex-encoded record (DIF VIF value-bytes) offline
    Decode {
        record: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Init { port, address } => {
            let mut master = MBusMaster::new(SerialMBusPort::new(&port));
            match master.initialize_client(address).await? {
                ExchangeResult::Ack => println!("slave {address} acknowledged"),
                ExchangeResult::NoResponse => println!("no response from {address}"),
                ExchangeResult::Data(bytes) => {
                    println!("unexpected data response: {}", to_hex(&bytes))
                }
            }
        }
        Commands::Request { port, address } => {
            let mut master = MBusMaster::new(SerialMBusPort::new(&port));
            match master.request_user_data2(address).await? {
                ExchangeResult::Data(bytes) => println!("{}", to_hex(&bytes)),
                ExchangeResult::Ack => println!("slave {address} acknowledged without data"),
                ExchangeResult::NoResponse => println!("no response from {address}"),
            }
        }
        Commands::Decode { record } => {
            let cleaned: String = record.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = hex::decode(&cleaned).map_err(|_| MBusError::InvalidHexString)?;
            let value = decode_record(&bytes)?;
            println!("{value:?}");
        }
    }

    Ok(())
}

fn to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
