#![allow(non_snake_case)]

use super::*;

#[test]
fn MemoryChannel___send_then_loopback___reads_same_bytes() {
    let mut channel = MemoryChannel::new();
    channel.send(&[1, 2, 3]).unwrap();
    channel.loopback();

    let mut buf = [0u8; 3];
    channel.receive(&mut buf).unwrap();

    assert_eq!(buf, [1, 2, 3]);
    assert_eq!(channel.remaining(), 0);
    assert!(channel.output().is_empty());
}

#[test]
fn MemoryChannel___partial_receive___leaves_tail_in_order() {
    let mut channel = MemoryChannel::with_input(vec![1u8, 2, 3, 4, 5]);

    let mut head = [0u8; 2];
    channel.receive(&mut head).unwrap();
    let mut tail = [0u8; 3];
    channel.receive(&mut tail).unwrap();

    assert_eq!(head, [1, 2]);
    assert_eq!(tail, [3, 4, 5]);
    assert_eq!(channel.remaining(), 0);
}

#[test]
fn MemoryChannel___receive_past_end___returns_unexpected_eof() {
    let mut channel = MemoryChannel::with_input(vec![9u8, 9]);

    let mut buf = [0u8; 4];
    let err = channel.receive(&mut buf).unwrap_err();

    assert!(matches!(
        err,
        TransportError::UnexpectedEof {
            wanted: 4,
            available: 2
        }
    ));
    assert_eq!(channel.remaining(), 2, "failed read must not consume input");
}

#[test]
fn MemoryChannel___take_output___empties_output() {
    let mut channel = MemoryChannel::new();
    channel.send(b"abc").unwrap();

    assert_eq!(channel.take_output(), b"abc".to_vec());
    assert!(channel.output().is_empty());
}

#[test]
fn MemoryChannel___push_input___appends_to_read_side() {
    let mut channel = MemoryChannel::with_input(vec![1u8]);
    channel.push_input(&[2, 3]);

    let mut buf = [0u8; 3];
    channel.receive(&mut buf).unwrap();

    assert_eq!(buf, [1, 2, 3]);
}

#[test]
fn DuplexChannel___flush___delivers_to_peer() {
    let (mut a, mut b) = DuplexChannel::pair();
    a.send(&[4, 5]).unwrap();
    a.send(&[6]).unwrap();
    a.flush().unwrap();

    let mut buf = [0u8; 3];
    b.receive(&mut buf).unwrap();

    assert_eq!(buf, [4, 5, 6]);
}

#[test]
fn DuplexChannel___receive_spanning_chunks___assembles_bytes() {
    let (mut a, mut b) = DuplexChannel::pair();
    a.send(&[1]).unwrap();
    a.flush().unwrap();
    a.send(&[2, 3]).unwrap();
    a.flush().unwrap();

    let mut first = [0u8; 2];
    b.receive(&mut first).unwrap();
    let mut second = [0u8; 1];
    b.receive(&mut second).unwrap();

    assert_eq!(first, [1, 2]);
    assert_eq!(second, [3]);
}

#[test]
fn DuplexChannel___peer_dropped___receive_returns_closed() {
    let (a, mut b) = DuplexChannel::pair();
    drop(a);

    let mut buf = [0u8; 1];
    let err = b.receive(&mut buf).unwrap_err();

    assert!(matches!(err, TransportError::Closed));
}

#[test]
fn DuplexChannel___across_threads___round_trips() {
    let (mut client, mut server) = DuplexChannel::pair();

    let handle = std::thread::spawn(move || {
        let mut buf = [0u8; 2];
        server.receive(&mut buf).unwrap();
        server.send(&[buf[0] + buf[1]]).unwrap();
        server.flush().unwrap();
    });

    client.send(&[20, 22]).unwrap();
    client.flush().unwrap();
    let mut reply = [0u8; 1];
    client.receive(&mut reply).unwrap();
    handle.join().unwrap();

    assert_eq!(reply, [42]);
}

#[test]
fn StreamChannel___cursor___reads_and_writes() {
    let mut channel = StreamChannel::new(std::io::Cursor::new(vec![7u8, 8]));

    let mut buf = [0u8; 2];
    channel.receive(&mut buf).unwrap();
    channel.send(&[9]).unwrap();
    channel.flush().unwrap();

    assert_eq!(buf, [7, 8]);
    assert_eq!(channel.into_inner().into_inner(), vec![7, 8, 9]);
}

#[test]
fn StreamChannel___eof___returns_closed() {
    let mut channel = StreamChannel::new(std::io::Cursor::new(Vec::<u8>::new()));

    let mut buf = [0u8; 1];
    let err = channel.receive(&mut buf).unwrap_err();

    assert!(matches!(err, TransportError::Closed));
}

#[test]
fn Channel___through_mut_ref___forwards() {
    let mut inner = MemoryChannel::new();
    {
        let mut by_ref: &mut MemoryChannel = &mut inner;
        Channel::send(&mut by_ref, &[1]).unwrap();
    }

    assert_eq!(inner.output(), &[1]);
}
