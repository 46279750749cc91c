#![no_std]
#![no_main]

use embassy_net::{Config as NetConfig, DhcpConfig, Stack, StackResources};
use esp_hal::clock::CpuClock;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_embassy::Executor;
use esp_println::println;
use esp_wifi::wifi;
use static_cell::StaticCell;

use enviro_core::metrics::DeviceIdentity;
use enviro_core::sampler::SensorBank;
use enviro_node_rs::config;
use enviro_node_rs::context::NodeContext;
use enviro_node_rs::server::HttpServer;
use enviro_node_rs::wifi::{WiFiManager, format_mac};

// Add app descriptor for espflash compatibility
esp_bootloader_esp_idf::esp_app_desc!();

// Static cells for embassy components
static WIFI_INIT_CELL: StaticCell<esp_wifi::EspWifiController<'static>> = StaticCell::new();
static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
static EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// Embassy task to run the network stack
#[embassy_executor::task]
async fn net_task(
    mut runner: embassy_net::Runner<'static, esp_wifi::wifi::WifiDevice<'static>>,
) -> ! {
    runner.run().await
}

/// Main application task: associate, report the network identity, then
/// serve metrics requests forever. Sampling only ever happens inside the
/// server's request handling.
#[embassy_executor::task]
async fn app_task(
    mut wifi_manager: WiFiManager<'static>,
    stack: Stack<'static>,
    mut ctx: NodeContext,
) -> ! {
    println!("[WIFI] Connecting to WiFi");
    match wifi_manager
        .connect_until_associated(config::WIFI_SSID, config::WIFI_PASSWORD)
        .await
    {
        Ok(()) => {
            let ip = wifi_manager.wait_for_ip().await;

            // Dump the connection the way the board reports it on boot
            println!("[WIFI] Connected to {}", config::WIFI_SSID);
            println!("[WIFI] IP address: {}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]);
            println!("[WIFI] MAC address: {}", ctx.identity.mac);
            if config::DEVICE_HOSTNAME.is_empty() {
                println!("[WIFI] Hostname: (board default)");
            } else {
                println!("[WIFI] Hostname: {}", config::DEVICE_HOSTNAME);
            }
            println!(
                "[HTTP] HTTP server started at http://{}.{}.{}.{}:{}",
                ip[0],
                ip[1],
                ip[2],
                ip[3],
                config::HTTP_PORT
            );
        }
        Err(_) => {
            // Only reachable with a configured attempt bound.
            println!("[WIFI] Association gave up, continuing without connectivity");
        }
    }

    let mut server = HttpServer::new(stack, config::HTTP_PORT);
    server.run(&mut ctx).await
}

#[esp_hal::main]
fn main() -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap allocator for the WiFi driver (72KB)
    esp_alloc::heap_allocator!(size: 72 * 1024);

    // Initialize embassy time system
    let timer_group0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timer_group0.timer0);

    /* SENSOR BUS */
    println!("[I2C] Initialising sensor bus");
    let i2c_config = I2cConfig::default().with_frequency(Rate::from_khz(config::I2C_FREQUENCY_KHZ));
    let mut i2c = match I2c::new(peripherals.I2C0, i2c_config) {
        Ok(i2c) => {
            println!("[I2C] Sensor bus initialised");
            i2c.with_sda(peripherals.GPIO4).with_scl(peripherals.GPIO5)
        }
        Err(e) => {
            println!("[I2C] Failed to initialise sensor bus: {:?}", e);
            panic!("I2C initialisation failed");
        }
    };
    let mut delay = esp_hal::delay::Delay::new();

    /* SENSOR INIT */
    // A sensor whose init fails stays unusable for the process lifetime;
    // its reads simply fail per pass and render as FAILED.
    let mut sensors = SensorBank::new();

    println!("[BH1750] Initialising BH1750");
    match sensors.light.init(&mut i2c) {
        Ok(()) => println!("[BH1750] Continuous high-res mode started"),
        Err(e) => println!("[BH1750] Error initialising BH1750: {:?}", e),
    }

    println!("[SGP30] Initialising SGP30");
    match sensors.air.init(&mut i2c, &mut delay) {
        Ok(()) => match sensors.air.serial(&mut i2c, &mut delay) {
            Ok(serial) => println!(
                "[SGP30] Found SGP30 serial #{:04X}{:04X}{:04X}",
                serial[0], serial[1], serial[2]
            ),
            Err(e) => println!("[SGP30] Serial read failed: {:?}", e),
        },
        Err(e) => println!("[SGP30] Error initialising SGP30: {:?}", e),
    }

    /* WIFI */
    println!("[WIFI] Initialising WiFi");
    let timer_group1 = TimerGroup::new(peripherals.TIMG1);
    let mut rng = Rng::new(peripherals.RNG);
    let wifi_init = esp_wifi::init(timer_group1.timer0, rng, peripherals.RADIO_CLK).unwrap();
    let wifi_init_ref = WIFI_INIT_CELL.init(wifi_init);

    let (wifi_controller, wifi_interfaces) = wifi::new(wifi_init_ref, peripherals.WIFI).unwrap();
    let wifi_device = wifi_interfaces.sta;
    let mac = wifi_device.mac_address();

    // Configure hostname (this can make it easier to find the device on
    // the network); board defaults if DEVICE_HOSTNAME is left empty
    let mut dhcp_config = DhcpConfig::default();
    if config::DEVICE_HOSTNAME.is_empty() {
        println!("[WIFI] No Device ID is Defined, Defaulting to board defaults");
    } else {
        dhcp_config.hostname = config::DEVICE_HOSTNAME.try_into().ok();
    }

    let seed = ((rng.random() as u64) << 32) | rng.random() as u64;
    let stack_resources = STACK_RESOURCES.init(StackResources::new());
    let (stack, runner) = embassy_net::new(
        wifi_device,
        NetConfig::dhcpv4(dhcp_config),
        stack_resources,
        seed,
    );

    let wifi_manager = WiFiManager::new(wifi_controller, stack);

    /* APPLICATION CONTEXT */
    let identity = DeviceIdentity::new(config::DEVICE_HOSTNAME, format_mac(mac).as_str());
    let ctx = NodeContext::new(i2c, sensors, identity, config::TEMPERATURE_UNIT);

    // Initialize embassy executor and run tasks
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        println!("[MAIN] Spawning network task...");
        spawner.spawn(net_task(runner)).ok();

        println!("[MAIN] Spawning application task...");
        spawner.spawn(app_task(wifi_manager, stack, ctx)).ok();
    });
}
