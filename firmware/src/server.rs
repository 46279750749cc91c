//! HTTP server module
//!
//! Accepts one connection at a time and answers metrics requests with a
//! freshly sampled document. Unmatched paths get the 404 diagnostic
//! page. There is no caching: every hit on the data route triggers a
//! full sensor pass.

use embassy_net::Stack;
use embassy_net::tcp::TcpSocket;
use embassy_time::Duration;
use enviro_core::http::{self, Method, Request, Route};
use esp_println::println;

use crate::context::NodeContext;

/// Largest request head the server will buffer.
const MAX_REQUEST_SIZE: usize = 1024;

/// HTTP server for the metrics endpoint
pub struct HttpServer<'a> {
    port: u16,
    stack: Stack<'a>,
}

impl<'a> HttpServer<'a> {
    /// Create a new HTTP server on the given port
    pub fn new(stack: Stack<'a>, port: u16) -> Self {
        Self { port, stack }
    }

    /// Get the bound port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Accept loop. Requests are serviced strictly one at a time: a
    /// second client waits until the loop returns to `accept`. Socket
    /// errors abandon the connection and the loop continues.
    pub async fn run(&mut self, ctx: &mut NodeContext) -> ! {
        let mut rx_buffer = [0u8; 1024];
        let mut tx_buffer = [0u8; 1024];

        println!("[HTTP] Server listening on port {}", self.port);

        loop {
            let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
            socket.set_timeout(Some(Duration::from_secs(10)));

            match socket.accept(self.port).await {
                Ok(()) => {
                    if let Err(e) = Self::handle_connection(&mut socket, ctx).await {
                        println!("[HTTP] Connection handling error: {:?}", e);
                    }
                }
                Err(e) => {
                    println!("[HTTP] Accept error: {:?}", e);
                }
            }

            socket.close();
            let _ = socket.flush().await;
            socket.abort();
        }
    }

    /// Service one request on an accepted connection.
    async fn handle_connection(
        socket: &mut TcpSocket<'_>,
        ctx: &mut NodeContext,
    ) -> Result<(), embassy_net::tcp::Error> {
        let mut buf = [0u8; MAX_REQUEST_SIZE];
        let mut total = 0usize;

        // Read until the blank line ending the headers or the buffer is
        // full.
        loop {
            let n = socket.read(&mut buf[total..]).await?;
            if n == 0 {
                break;
            }
            total += n;
            if total >= MAX_REQUEST_SIZE {
                break;
            }
            if buf[..total].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        if total == 0 {
            // Connection closed before any data.
            return Ok(());
        }

        // A request that cannot be parsed is never a hard failure: it is
        // described back on the diagnostic page like any unmatched one.
        let head = core::str::from_utf8(&buf[..total]).unwrap_or("");
        let request = Request::parse(head).unwrap_or(Request {
            method: Method::Post,
            path: "",
            query: "",
        });

        match http::route(request.path) {
            Route::Metrics => {
                let status = ctx.sample();
                let body = ctx.render(status);
                println!(
                    "[HTTP] {} {} -> 200 (pass status {:#04b})",
                    request.method.as_str(),
                    request.path,
                    status.bits()
                );
                let head =
                    http::response_head(200, "OK", http::CONTENT_TYPE_PLAIN, body.len());
                socket.write(head.as_bytes()).await?;
                socket.write(body.as_bytes()).await?;
            }
            Route::NotFound => {
                let body = http::render_not_found(&request);
                println!(
                    "[HTTP] {} {} -> 404",
                    request.method.as_str(),
                    request.path
                );
                let head =
                    http::response_head(404, "Not Found", http::CONTENT_TYPE_HTML, body.len());
                socket.write(head.as_bytes()).await?;
                socket.write(body.as_bytes()).await?;
            }
        }

        socket.flush().await?;
        Ok(())
    }
}
